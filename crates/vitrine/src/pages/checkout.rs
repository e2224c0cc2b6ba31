//! Checkout page.

use crate::page_object::{PageContext, PageObject};
use crate::result::VitrineResult;
use tracing::debug;

/// Path of the checkout page
pub const CHECKOUT_PATH: &str = "/checkout";

/// URL fragment of the confirmation page
pub const SUCCESS_FRAGMENT: &str = "checkout_success";

/// Element roles of the checkout page
pub mod roles {
    use crate::locator::{ElementRole, Selector};

    const PAGE: &str = "checkout";

    /// Checkout form, identifies the page
    #[must_use]
    pub fn form() -> ElementRole {
        ElementRole::new(PAGE, "checkout form", Selector::css("form[action='/checkout']"))
            .or(Selector::xpath("//form[contains(@action,'checkout')]"))
    }

    /// Order summary box
    #[must_use]
    pub fn order_summary() -> ElementRole {
        ElementRole::new(PAGE, "order summary", Selector::css(".order-summary"))
            .or(Selector::xpath("//div[contains(@class,'order-details')]"))
    }

    /// One row per ordered line
    #[must_use]
    pub fn order_rows() -> ElementRole {
        ElementRole::new(PAGE, "order rows", Selector::css(".order-summary tbody tr"))
            .or(Selector::css(".order-item"))
    }

    /// Recipient name input
    #[must_use]
    pub fn name() -> ElementRole {
        ElementRole::new(PAGE, "name input", Selector::css("form[action='/checkout'] input[name='name']"))
            .or(Selector::css("#name"))
    }

    /// Shipping address input
    #[must_use]
    pub fn address() -> ElementRole {
        ElementRole::new(
            PAGE,
            "address input",
            Selector::css("form[action='/checkout'] input[name='address']"),
        )
        .or(Selector::css("#address"))
    }

    /// Phone number input
    #[must_use]
    pub fn phone() -> ElementRole {
        ElementRole::new(PAGE, "phone input", Selector::css("form[action='/checkout'] input[name='phone']"))
            .or(Selector::css("#phone"))
    }

    /// Order note
    #[must_use]
    pub fn note() -> ElementRole {
        ElementRole::new(PAGE, "note textarea", Selector::css("form[action='/checkout'] textarea[name='note']"))
            .or(Selector::css("#note"))
    }

    /// Place-order button
    #[must_use]
    pub fn submit() -> ElementRole {
        ElementRole::new(
            PAGE,
            "place-order button",
            Selector::css("form[action='/checkout'] button[type='submit']"),
        )
        .or(Selector::xpath(
            "//button[contains(.,'Place Order') or contains(.,'Đặt hàng')]",
        ))
    }
}

/// Checkout page
#[derive(Debug, Clone, Copy)]
pub struct CheckoutPage<'a> {
    ctx: PageContext<'a>,
}

impl PageObject for CheckoutPage<'_> {
    fn url_pattern(&self) -> &str {
        CHECKOUT_PATH
    }

    fn page_name(&self) -> &str {
        "checkout"
    }
}

impl<'a> CheckoutPage<'a> {
    /// Bind to a scenario's context
    #[must_use]
    pub const fn new(ctx: PageContext<'a>) -> Self {
        Self { ctx }
    }

    /// Open the checkout form
    pub async fn navigate(&self) -> VitrineResult<()> {
        self.ctx.open(CHECKOUT_PATH, &roles::form()).await
    }

    /// Location is the checkout form (not its confirmation page)
    pub async fn is_on_checkout_page(&self) -> VitrineResult<bool> {
        let url = self.ctx.current_url().await?;
        Ok(url.contains(CHECKOUT_PATH) && !url.contains(SUCCESS_FRAGMENT))
    }

    /// Lines listed in the order summary
    pub async fn order_item_count(&self) -> VitrineResult<usize> {
        self.ctx
            .count(&roles::order_summary(), &roles::order_rows())
            .await
    }

    /// Fill every field of the checkout form
    pub async fn fill_checkout_form(
        &self,
        name: &str,
        address: &str,
        phone: &str,
        note: &str,
    ) -> VitrineResult<()> {
        self.ctx.fill(&roles::name(), name).await?;
        self.ctx.fill(&roles::address(), address).await?;
        self.ctx.fill(&roles::phone(), phone).await?;
        self.ctx.fill(&roles::note(), note).await
    }

    /// Place the order; a rejected form stays on the page
    pub async fn submit_checkout(&self) -> VitrineResult<()> {
        self.ctx.click(&roles::submit()).await?;
        if !self.ctx.wait_for_url(SUCCESS_FRAGMENT).await? {
            debug!("checkout stayed on the form");
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::{TestConfig, Timeouts};
    use crate::mock::{MockElement, MockSession};

    fn config() -> TestConfig {
        TestConfig::new("http://shop.test").with_timeouts(Timeouts {
            element_ms: 60,
            navigation_ms: 80,
            settle_ms: 80,
            poll_ms: 5,
        })
    }

    fn session() -> MockSession {
        MockSession::new()
            .with_route(CHECKOUT_PATH, |dom| {
                let summary = dom.add(roles::order_summary().primary().clone(), MockElement::new("div"));
                dom.add_child(&summary, roles::order_rows().primary().clone(), MockElement::new("tr"));
                let form = dom.add(roles::form().primary().clone(), MockElement::new("form"));
                for role in [roles::name(), roles::address(), roles::phone(), roles::note()] {
                    dom.add_child(&form, role.primary().clone(), MockElement::new("input"));
                }
                dom.add_child(
                    &form,
                    roles::submit().primary().clone(),
                    MockElement::new("button").on_click(|dom| {
                        let phone = dom.value_of(roles::phone().primary()).unwrap_or_default();
                        if phone.len() >= 10 && phone.chars().all(|c| c.is_ascii_digit()) {
                            dom.navigate("http://shop.test/checkout_success");
                        }
                    }),
                );
            })
            .with_route("/checkout_success", |_| {})
    }

    #[tokio::test]
    async fn test_checkout_lists_items() {
        let session = session();
        let config = config();
        let page = CheckoutPage::new(PageContext::new(&session, &config));
        page.navigate().await.unwrap();
        assert!(page.is_on_checkout_page().await.unwrap());
        assert_eq!(page.order_item_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_valid_checkout_leaves_form() {
        let session = session();
        let config = config();
        let page = CheckoutPage::new(PageContext::new(&session, &config));
        page.navigate().await.unwrap();
        page.fill_checkout_form("Test User", "123 Test Street", "0123456789", "note")
            .await
            .unwrap();
        page.submit_checkout().await.unwrap();
        assert!(!page.is_on_checkout_page().await.unwrap());
        assert!(page.ctx.url_contains(SUCCESS_FRAGMENT).await.unwrap());
    }

    #[tokio::test]
    async fn test_invalid_phone_stays_on_form() {
        let session = session();
        let config = config();
        let page = CheckoutPage::new(PageContext::new(&session, &config));
        page.navigate().await.unwrap();
        page.fill_checkout_form("Test User", "123 Test Street", "123", "note")
            .await
            .unwrap();
        page.submit_checkout().await.unwrap();
        assert!(page.is_on_checkout_page().await.unwrap());
    }
}
