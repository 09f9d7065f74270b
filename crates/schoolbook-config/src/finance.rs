use crate::env_or;

/// Invoice issuing rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinanceConfig {
    /// Days between issue date and due date.
    pub invoice_due_days: i64,
    /// Prefix of generated invoice numbers.
    pub invoice_prefix: String,
}

impl FinanceConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let invoice_due_days = env_or("INVOICE_DUE_DAYS", defaults.invoice_due_days);
        Self {
            invoice_due_days: if invoice_due_days < 0 {
                defaults.invoice_due_days
            } else {
                invoice_due_days
            },
            invoice_prefix: env_or("INVOICE_PREFIX", defaults.invoice_prefix),
        }
    }
}

impl Default for FinanceConfig {
    fn default() -> Self {
        Self {
            invoice_due_days: 30,
            invoice_prefix: "INV".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = FinanceConfig::default();
        assert_eq!(cfg.invoice_due_days, 30);
        assert_eq!(cfg.invoice_prefix, "INV");
    }
}
