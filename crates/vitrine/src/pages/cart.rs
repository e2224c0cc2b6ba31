//! Shopping cart page.

use crate::page_object::{PageContext, PageObject};
use crate::result::{VitrineError, VitrineResult};
use tracing::debug;

/// Path of the cart page
pub const CART_PATH: &str = "/shoppingCart";

/// Element roles of the cart page
pub mod roles {
    use crate::locator::{ElementRole, Selector};

    const PAGE: &str = "cart";

    /// Cart container, identifies the page (present even when empty)
    #[must_use]
    pub fn cart() -> ElementRole {
        ElementRole::new(PAGE, "cart container", Selector::css(".shopping-cart"))
            .or(Selector::xpath(
                "//h2[contains(.,'Shopping Cart') or contains(.,'Giỏ hàng')]",
            ))
    }

    /// One row per cart line
    #[must_use]
    pub fn rows() -> ElementRole {
        ElementRole::new(PAGE, "cart rows", Selector::css("table.cart-table tbody tr"))
            .or(Selector::css(".cart-item"))
    }

    /// Quantity input inside a row
    #[must_use]
    pub fn quantity() -> ElementRole {
        ElementRole::new(PAGE, "quantity input", Selector::css("input[name='quantity']"))
            .or(Selector::xpath(".//input[@type='number']"))
    }
}

/// Shopping cart page
#[derive(Debug, Clone, Copy)]
pub struct CartPage<'a> {
    ctx: PageContext<'a>,
}

impl PageObject for CartPage<'_> {
    fn url_pattern(&self) -> &str {
        CART_PATH
    }

    fn page_name(&self) -> &str {
        "cart"
    }
}

impl<'a> CartPage<'a> {
    /// Bind to a scenario's context
    #[must_use]
    pub const fn new(ctx: PageContext<'a>) -> Self {
        Self { ctx }
    }

    /// Open the cart
    pub async fn navigate(&self) -> VitrineResult<()> {
        self.ctx.open(CART_PATH, &roles::cart()).await
    }

    /// Location is the cart
    pub async fn is_on_cart_page(&self) -> VitrineResult<bool> {
        self.ctx.is_on(self).await
    }

    /// Lines in the cart
    pub async fn item_count(&self) -> VitrineResult<usize> {
        self.ctx.count(&roles::cart(), &roles::rows()).await
    }

    /// Set the quantity of line `index` and wait for the cart to reflect it.
    /// A quantity of zero removes the line.
    pub async fn update_quantity(&self, index: usize, quantity: u32) -> VitrineResult<()> {
        let rows = roles::rows();
        let input = roles::quantity();
        let before = self.ctx.snapshot(&rows).await?;
        let row = self
            .ctx
            .items(&rows)
            .await?
            .into_iter()
            .nth(index)
            .ok_or_else(|| VitrineError::NotFound {
                role: format!("{} #{index}", rows.label()),
                strategies: rows.strategy_count(),
            })?;
        let field = self.ctx.require_within(&row, &input).await?;
        self.ctx.fill_handle(&input, &field, &quantity.to_string()).await?;
        self.ctx.submit_handle(&input, &field).await?;

        let settled = if quantity == 0 {
            let expected = before.row_count().saturating_sub(1);
            self.ctx.await_count(&rows, expected).await?
        } else {
            self.ctx.await_refresh(&rows, &before).await?
        };
        if !settled {
            debug!(index, quantity, "cart did not change after quantity update");
        }
        Ok(())
    }
}
