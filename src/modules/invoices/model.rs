pub use schoolbook_models::finance::{
    BulkInvoiceResult, CreateInvoiceDto, Invoice, InvoiceDetail, InvoiceFilterParams,
    InvoiceLineItem, InvoiceStatus, PaginatedInvoicesResponse,
};
