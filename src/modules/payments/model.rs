pub use schoolbook_models::finance::{CreatePaymentDto, Payment, PaymentMethod, PaymentReceipt};
