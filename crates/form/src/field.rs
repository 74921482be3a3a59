//! Single-value form fields.
//!
//! The scanner uses two of these: the field the barcode reader types into,
//! and the warehouse selector whose current value is stamped onto rows.

use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

pub type FieldHandle = Arc<dyn FormField + Send + Sync>;

/// A single text field on the host form.
#[async_trait]
pub trait FormField: Send + Sync {
    /// Field name, as bound in the scanner configuration. Used for logging.
    fn name(&self) -> &str;

    /// Current value of the field. An unset field reads as the empty string.
    async fn value(&self) -> String;

    /// Replace the value of the field.
    async fn set_value(&self, value: &str) -> Result<()>;
}

/// In-memory form field.
///
/// # Examples
///
/// ```
/// use stockscan_form::{FormField, MemoryField};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let field = MemoryField::new("current_warehouse").with_value("Stores - WH");
/// assert_eq!(field.value().await, "Stores - WH");
///
/// field.set_value("").await?;
/// assert!(field.value().await.is_empty());
/// # Ok(())
/// # }
/// ```
pub struct MemoryField {
    name: String,
    value: RwLock<String>,
}
impl MemoryField {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), value: RwLock::new(String::new()) }
    }

    pub fn with_value(self, value: impl Into<String>) -> Self {
        Self { value: RwLock::new(value.into()), ..self }
    }
}

#[async_trait]
impl FormField for MemoryField {
    fn name(&self) -> &str {
        &self.name
    }

    async fn value(&self) -> String {
        self.value.read().await.clone()
    }

    async fn set_value(&self, value: &str) -> Result<()> {
        let mut guard = self.value.write().await;
        guard.clear();
        guard.push_str(value);
        Ok(())
    }
}
