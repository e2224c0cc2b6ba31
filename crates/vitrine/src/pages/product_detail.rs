//! Product detail page (`/productDetail?id=N`).

use crate::page_object::{PageContext, PageObject};
use crate::result::VitrineResult;

/// Path of the detail page
pub const DETAIL_PATH: &str = "/productDetail";

/// Element roles of the detail page
pub mod roles {
    use crate::locator::{ElementRole, Selector};

    const PAGE: &str = "product-detail";

    /// Product name heading
    #[must_use]
    pub fn product_name() -> ElementRole {
        ElementRole::new(PAGE, "product name", Selector::css(".product-details .product-name"))
            .or(Selector::xpath("//div[contains(@class,'product-detail')]//h3"))
    }

    /// Add-to-cart button
    #[must_use]
    pub fn add_to_cart() -> ElementRole {
        ElementRole::new(
            PAGE,
            "add-to-cart button",
            Selector::css("form[action*='addToCart'] button[type='submit']"),
        )
        .or(Selector::xpath(
            "//button[contains(.,'Add to cart') or contains(.,'Thêm vào giỏ')]",
        ))
    }
}

/// Product detail page
#[derive(Debug, Clone, Copy)]
pub struct ProductDetailPage<'a> {
    ctx: PageContext<'a>,
}

impl PageObject for ProductDetailPage<'_> {
    fn url_pattern(&self) -> &str {
        DETAIL_PATH
    }

    fn page_name(&self) -> &str {
        "product-detail"
    }
}

impl<'a> ProductDetailPage<'a> {
    /// Bind to a scenario's context
    #[must_use]
    pub const fn new(ctx: PageContext<'a>) -> Self {
        Self { ctx }
    }

    /// Load the detail page of a product id. Unknown ids may redirect, so
    /// nothing is awaited here; the queries wait for themselves.
    pub async fn navigate_to(&self, id: u64) -> VitrineResult<()> {
        self.ctx.goto(&format!("{DETAIL_PATH}?id={id}")).await
    }

    /// Location is a detail page
    pub async fn is_on_detail_page(&self) -> VitrineResult<bool> {
        self.ctx.is_on(self).await
    }

    /// Name heading visible
    pub async fn is_product_name_displayed(&self) -> VitrineResult<bool> {
        self.ctx.is_displayed(&roles::product_name()).await
    }

    /// Name heading text
    pub async fn product_name(&self) -> VitrineResult<String> {
        self.ctx.text(&roles::product_name()).await
    }

    /// Add this product to the cart and wait for the redirect away from the page
    pub async fn add_to_cart(&self) -> VitrineResult<()> {
        self.ctx.click(&roles::add_to_cart()).await?;
        self.ctx.wait_for_url_change(DETAIL_PATH).await?;
        Ok(())
    }
}
