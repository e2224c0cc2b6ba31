//! Shop (product listing) page.

use crate::page_object::{PageContext, PageObject};
use crate::result::VitrineResult;

/// Path of the shop listing
pub const SHOP_PATH: &str = "/products";

/// Element roles of the shop page
pub mod roles {
    use crate::locator::{ElementRole, Selector};

    const PAGE: &str = "shop";

    /// Product grid, identifies the page
    #[must_use]
    pub fn product_grid() -> ElementRole {
        ElementRole::new(PAGE, "product grid", Selector::css(".shop-products"))
            .or(Selector::xpath("//div[contains(@class,'product-grid')]"))
    }

    /// One card per listed product
    #[must_use]
    pub fn product_cards() -> ElementRole {
        ElementRole::new(PAGE, "product cards", Selector::css(".shop-products .product-item"))
            .or(Selector::css(".single-product"))
    }

    /// Detail link inside a card
    #[must_use]
    pub fn detail_link() -> ElementRole {
        ElementRole::new(PAGE, "product detail link", Selector::css("a[href*='productDetail']"))
    }

    /// Add-to-cart control inside a card
    #[must_use]
    pub fn add_to_cart() -> ElementRole {
        ElementRole::new(PAGE, "add-to-cart link", Selector::css("a[href*='addToCart']"))
            .or(Selector::xpath(".//a[contains(@class,'add-to-cart')]"))
    }

    /// Keyword search input
    #[must_use]
    pub fn search_input() -> ElementRole {
        ElementRole::new(PAGE, "search input", Selector::css("input[name='keyword']"))
            .or(Selector::xpath("//input[@type='search' or @placeholder='Search']"))
    }
}

/// Shop listing page
#[derive(Debug, Clone, Copy)]
pub struct ShopPage<'a> {
    ctx: PageContext<'a>,
}

impl PageObject for ShopPage<'_> {
    fn url_pattern(&self) -> &str {
        SHOP_PATH
    }

    fn page_name(&self) -> &str {
        "shop"
    }
}

impl<'a> ShopPage<'a> {
    /// Bind to a scenario's context
    #[must_use]
    pub const fn new(ctx: PageContext<'a>) -> Self {
        Self { ctx }
    }

    /// Open the listing
    pub async fn navigate(&self) -> VitrineResult<()> {
        self.ctx.open(SHOP_PATH, &roles::product_grid()).await
    }

    /// Location is the listing (including search results)
    pub async fn is_on_shop_page(&self) -> VitrineResult<bool> {
        self.ctx.is_on(self).await
    }

    /// Listed products; `0` when the grid never shows
    pub async fn product_count(&self) -> VitrineResult<usize> {
        self.ctx
            .count(&roles::product_grid(), &roles::product_cards())
            .await
    }

    /// Search by keyword, opening the listing first when elsewhere; waits for
    /// the listing to be replaced
    pub async fn search_product(&self, keyword: &str) -> VitrineResult<()> {
        if !self.is_on_shop_page().await? {
            self.navigate().await?;
        }
        let cards = roles::product_cards();
        let before = self.ctx.snapshot(&cards).await?;
        self.ctx.fill(&roles::search_input(), keyword).await?;
        self.ctx.submit(&roles::search_input()).await?;
        self.ctx.await_refresh(&cards, &before).await?;
        Ok(())
    }

    /// Open the first product's detail page
    pub async fn click_first_product(&self) -> VitrineResult<()> {
        let link = roles::detail_link();
        let card = self.ctx.require(&roles::product_cards()).await?;
        let handle = self.ctx.require_within(&card, &link).await?;
        self.ctx.click_handle(&link, &handle).await?;
        self.ctx.wait_for_url("productDetail").await?;
        Ok(())
    }

    /// Add the first listed product to the cart
    pub async fn add_first_product_to_cart(&self) -> VitrineResult<()> {
        let add = roles::add_to_cart();
        let card = self.ctx.require(&roles::product_cards()).await?;
        let handle = self.ctx.require_within(&card, &add).await?;
        self.ctx.click_handle(&add, &handle).await?;
        self.ctx.wait_for_url_change(SHOP_PATH).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::{TestConfig, Timeouts};
    use crate::locator::Selector;
    use crate::mock::{MockDom, MockElement, MockSession};

    fn config() -> TestConfig {
        TestConfig::new("http://shop.test").with_timeouts(Timeouts {
            element_ms: 60,
            navigation_ms: 80,
            settle_ms: 80,
            poll_ms: 5,
        })
    }

    fn listing(dom: &mut MockDom, names: &[&str]) {
        let grid = dom.add(roles::product_grid().primary().clone(), MockElement::new("div"));
        for (i, name) in names.iter().enumerate() {
            let card = dom.add_child(
                &grid,
                roles::product_cards().primary().clone(),
                MockElement::new("div").text(*name),
            );
            let url = format!("http://shop.test/productDetail?id={}", i + 1);
            dom.add_child(
                &card,
                roles::detail_link().primary().clone(),
                MockElement::new("a").on_click(move |dom| dom.navigate(&url)),
            );
        }
    }

    fn shop_dom(dom: &mut MockDom) {
        let keyword = dom.url().split("keyword=").nth(1).map(str::to_string);
        let form = dom.add(
            Selector::css("form.search"),
            MockElement::new("form").on_submit(|dom| {
                let kw = dom.value_of(roles::search_input().primary()).unwrap_or_default();
                dom.navigate(&format!("http://shop.test/products?keyword={kw}"));
            }),
        );
        dom.add_child(&form, roles::search_input().primary().clone(), MockElement::new("input"));
        let shown: Vec<&str> = ["Widget", "Gadget", "Doohickey"]
            .into_iter()
            .filter(|name| keyword.as_deref().map_or(true, |k| name.contains(k)))
            .collect();
        listing(dom, &shown);
    }

    fn session() -> MockSession {
        let session = MockSession::new().with_route(SHOP_PATH, shop_dom);
        session.dom().route("/productDetail", |_| {});
        session
    }

    #[tokio::test]
    async fn test_count_listing() {
        let session = session();
        let config = config();
        let shop = ShopPage::new(PageContext::new(&session, &config));
        shop.navigate().await.unwrap();
        assert!(shop.is_on_shop_page().await.unwrap());
        assert_eq!(shop.product_count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_click_first_product() {
        let session = session();
        let config = config();
        let shop = ShopPage::new(PageContext::new(&session, &config));
        shop.navigate().await.unwrap();
        shop.click_first_product().await.unwrap();
        assert!(shop.ctx.url_contains("productDetail?id=1").await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_shop_counts_zero() {
        let session = MockSession::new().with_route(SHOP_PATH, |dom| listing(dom, &[]));
        let config = config();
        let shop = ShopPage::new(PageContext::new(&session, &config));
        shop.navigate().await.unwrap();
        assert_eq!(shop.product_count().await.unwrap(), 0);
        assert!(shop.click_first_product().await.is_err());
    }

    #[tokio::test]
    async fn test_search_replaces_listing() {
        let session = session();
        let config = config();
        let shop = ShopPage::new(PageContext::new(&session, &config));
        shop.navigate().await.unwrap();
        shop.search_product("Gadget").await.unwrap();
        assert_eq!(shop.product_count().await.unwrap(), 1);
        assert!(shop.is_on_shop_page().await.unwrap());

        shop.search_product("").await.unwrap();
        assert_eq!(shop.product_count().await.unwrap(), 3);
    }
}
