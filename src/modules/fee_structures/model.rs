//! Fee structure models, re-exported from the `schoolbook-models` crate.

pub use schoolbook_models::finance::{
    ClassFeeTotal, CreateFeeStructureDto, FeeStructure, FeeStructureDetail,
    FeeStructureFilterParams, FeeStructureItem, FeeStructureItemInput, TermFeeSummary,
};
