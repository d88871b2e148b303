//! WhatsApp checkout handoff.
//!
//! Checkout is a one-way deep link into WhatsApp with a prefilled message
//! and the store's fixed contact number; the client opens it in a new
//! browsing context and no response is awaited.

use vitrine_platform::Product;

/// Builds `wa.me` deep links for the sales contact.
#[derive(Debug, Clone)]
pub struct WhatsAppHandoff {
    number: String,
    greeting: String,
}

impl WhatsAppHandoff {
    /// Create a handoff builder.
    ///
    /// The contact number is reduced to digits; `wa.me` rejects formatted
    /// numbers.
    #[must_use]
    pub fn new(number: &str, greeting: &str) -> Self {
        Self {
            number: number.chars().filter(char::is_ascii_digit).collect(),
            greeting: greeting.to_owned(),
        }
    }

    /// Link opening a conversation with the store's greeting message.
    #[must_use]
    pub fn contact_link(&self) -> String {
        self.link(&self.greeting)
    }

    /// Link opening a conversation asking about one product.
    #[must_use]
    pub fn product_link(&self, product: &Product) -> String {
        let message = product.sku.as_deref().map_or_else(
            || format!("Olá! Tenho interesse no produto {}.", product.name),
            |sku| format!("Olá! Tenho interesse no produto {} (SKU {sku}).", product.name),
        );
        self.link(&message)
    }

    fn link(&self, message: &str) -> String {
        format!(
            "https://wa.me/{}?text={}",
            self.number,
            urlencoding::encode(message)
        )
    }
}
