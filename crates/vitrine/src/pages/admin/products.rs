//! Admin products list view with the add/edit product forms.

use super::table::{ResourceKind, ResourceTable};
use crate::locator::ElementRole;
use crate::page_object::PageContext;
use crate::result::VitrineResult;
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use tracing::debug;

/// Element roles specific to the products view
pub mod roles {
    use crate::locator::{ElementRole, Selector};

    const PAGE: &str = "products";

    /// Add product modal
    #[must_use]
    pub fn add_modal() -> ElementRole {
        ElementRole::new(PAGE, "add modal", Selector::xpath("//div[@id='addRowModal']"))
    }

    /// Add product form
    #[must_use]
    pub fn add_form() -> ElementRole {
        ElementRole::new(PAGE, "add form", Selector::xpath("//form[@action='/addProduct']"))
    }

    /// Edit product form (modal or standalone page)
    #[must_use]
    pub fn edit_form() -> ElementRole {
        ElementRole::new(PAGE, "edit form", Selector::xpath("//form[@action='/updateProduct']"))
            .or(Selector::xpath("//form[contains(@action,'editProduct')]"))
    }

    /// Name input of the add form
    #[must_use]
    pub fn add_name_input() -> ElementRole {
        ElementRole::new(
            PAGE,
            "add name input",
            Selector::xpath("//form[@action='/addProduct']//input[@name='name']"),
        )
    }

    /// Error alert inside the modal
    #[must_use]
    pub fn modal_error() -> ElementRole {
        ElementRole::new(
            PAGE,
            "modal error alert",
            Selector::xpath(
                "//div[contains(@class,'modal-content')]//div[contains(@class,'alert-danger') or contains(@class,'alert-error')]",
            ),
        )
    }

    /// Input named `name` inside a form
    #[must_use]
    pub fn field(name: &'static str) -> ElementRole {
        ElementRole::new(PAGE, name, Selector::xpath(format!(".//input[@name='{name}']")))
    }

    /// Description textarea inside a form
    #[must_use]
    pub fn description() -> ElementRole {
        ElementRole::new(PAGE, "description", Selector::xpath(".//textarea[@name='description']"))
            .or(Selector::xpath(".//input[@name='description']"))
    }

    /// Category select inside a form
    #[must_use]
    pub fn category() -> ElementRole {
        ElementRole::new(PAGE, "category select", Selector::xpath(".//select[@name='categoryId']"))
            .or(Selector::xpath(".//select[@name='category']"))
    }

    /// Supplier select inside a form
    #[must_use]
    pub fn supplier() -> ElementRole {
        ElementRole::new(PAGE, "supplier select", Selector::xpath(".//select[@name='supplierId']"))
            .or(Selector::xpath(".//select[@name='supplier']"))
    }

    /// Submit button inside a form
    #[must_use]
    pub fn submit() -> ElementRole {
        ElementRole::new(PAGE, "form submit", Selector::xpath(".//button[@type='submit']"))
    }
}

/// Product form input; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductForm {
    /// Product name
    pub name: Option<String>,
    /// Stock keeping unit
    pub sku: Option<String>,
    /// Unit price
    pub price: Option<f64>,
    /// Units in stock
    pub quantity: Option<u32>,
    /// Free text description
    pub description: Option<String>,
    /// Category option label
    pub category: Option<String>,
    /// Supplier option label
    pub supplier: Option<String>,
}

impl ProductForm {
    /// Empty form
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the SKU
    #[must_use]
    pub fn sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    /// Set the price
    #[must_use]
    pub const fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Set the stock quantity
    #[must_use]
    pub const fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Set the description
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the category
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the supplier
    #[must_use]
    pub fn supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }

    /// Values used by the quick-add helper
    #[must_use]
    pub fn quick(name: &str, sku: &str) -> Self {
        Self::new()
            .name(name)
            .sku(sku)
            .price(10_000.0)
            .quantity(10)
            .description("Quick product")
            .category("Category A")
            .supplier("Supplier B")
    }
}

/// Products list view
#[derive(Debug, Clone, Copy)]
pub struct ProductsPage<'a> {
    table: ResourceTable<'a>,
}

impl<'a> Deref for ProductsPage<'a> {
    type Target = ResourceTable<'a>;

    fn deref(&self) -> &Self::Target {
        &self.table
    }
}

impl<'a> ProductsPage<'a> {
    /// Bind to a scenario's context
    #[must_use]
    pub const fn new(ctx: PageContext<'a>) -> Self {
        Self {
            table: ResourceTable::new(ctx, ResourceKind::Products),
        }
    }

    /// Add modal visible
    pub async fn is_add_modal_displayed(&self) -> VitrineResult<bool> {
        self.context().is_displayed(&roles::add_modal()).await
    }

    /// Add form visible
    pub async fn is_add_form_displayed(&self) -> VitrineResult<bool> {
        self.context().is_displayed(&roles::add_form()).await
    }

    /// Name input of the add form visible
    pub async fn is_add_name_input_displayed(&self) -> VitrineResult<bool> {
        self.context().is_displayed(&roles::add_name_input()).await
    }

    /// Error alert inside the modal visible
    pub async fn is_error_message_displayed(&self) -> VitrineResult<bool> {
        self.context().is_displayed(&roles::modal_error()).await
    }

    /// Fill the add form
    pub async fn fill_add_form(&self, form: &ProductForm) -> VitrineResult<()> {
        self.fill_form(&roles::add_form(), form).await
    }

    /// Submit the add form and wait for the table to refresh
    pub async fn submit_add_form(&self) -> VitrineResult<()> {
        self.submit_form(&roles::add_form()).await
    }

    /// Fill the edit form
    pub async fn fill_edit_form(&self, form: &ProductForm) -> VitrineResult<()> {
        self.fill_form(&roles::edit_form(), form).await
    }

    /// Submit the edit form and wait for the table to refresh
    pub async fn submit_edit_form(&self) -> VitrineResult<()> {
        self.submit_form(&roles::edit_form()).await
    }

    /// Open the add modal, fill it with defaults and submit
    pub async fn add_product_quick(&self, name: &str, sku: &str) -> VitrineResult<()> {
        self.click_add_button().await?;
        self.fill_add_form(&ProductForm::quick(name, sku)).await?;
        self.submit_add_form().await
    }

    /// Name column of row `index`
    pub async fn product_name(&self, index: usize) -> VitrineResult<String> {
        self.cell_text(index, 2).await
    }

    /// SKU column of row `index`
    pub async fn product_sku(&self, index: usize) -> VitrineResult<String> {
        self.cell_text(index, 3).await
    }

    /// Category column of row `index`
    pub async fn product_category(&self, index: usize) -> VitrineResult<String> {
        self.cell_text(index, 4).await
    }

    /// Supplier column of row `index`
    pub async fn product_supplier(&self, index: usize) -> VitrineResult<String> {
        self.cell_text(index, 5).await
    }

    async fn fill_form(&self, form_role: &ElementRole, form: &ProductForm) -> VitrineResult<()> {
        let ctx = self.context();
        let handle = ctx.require(form_role).await?;
        let price = form.price.map(|p| p.to_string());
        let quantity = form.quantity.map(|q| q.to_string());
        let inputs = [
            (roles::field("name"), form.name.as_deref()),
            (roles::field("sku"), form.sku.as_deref()),
            (roles::field("price"), price.as_deref()),
            (roles::field("quantity"), quantity.as_deref()),
            (roles::description(), form.description.as_deref()),
        ];
        for (role, value) in inputs {
            if let Some(value) = value {
                let field = ctx.require_within(&handle, &role).await?;
                ctx.fill_handle(&role, &field, value).await?;
            }
        }
        for (role, label) in [
            (roles::category(), form.category.as_deref()),
            (roles::supplier(), form.supplier.as_deref()),
        ] {
            if let Some(label) = label {
                let select = ctx.require_within(&handle, &role).await?;
                ctx.select_handle(&role, &select, label).await?;
            }
        }
        Ok(())
    }

    async fn submit_form(&self, form_role: &ElementRole) -> VitrineResult<()> {
        let ctx = self.context();
        let rows = super::table::roles::rows(ResourceKind::Products);
        let before = ctx.snapshot(&rows).await?;
        let form = ctx.require(form_role).await?;
        let submit = roles::submit();
        let button = ctx.require_within(&form, &submit).await?;
        ctx.click_handle(&submit, &button).await?;
        if !ctx.await_refresh(&rows, &before).await? {
            debug!(form = %form_role.label(), "product table unchanged after submit");
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::{MockDom, MockElement, MockSession};
    use crate::pages::admin::table::tests::{config, render_list};
    use std::sync::{Arc, Mutex};

    type Catalog = Arc<Mutex<Vec<Vec<String>>>>;

    fn add_form(dom: &mut MockDom, catalog: &Catalog) {
        let modal = dom.add(roles::add_modal().primary().clone(), MockElement::new("div"));
        let catalog = Arc::clone(catalog);
        let form = dom.add_child(&modal, roles::add_form().primary().clone(), MockElement::new("form"));
        for name in ["name", "sku", "price", "quantity"] {
            dom.add_child(&form, roles::field(name).primary().clone(), MockElement::new("input"));
        }
        dom.add_child(&form, roles::description().primary().clone(), MockElement::new("textarea"));
        dom.add_child(
            &form,
            roles::category().primary().clone(),
            MockElement::new("select").options(&["Category A", "Category B"]),
        );
        dom.add_child(
            &form,
            roles::supplier().primary().clone(),
            MockElement::new("select").options(&["Supplier A", "Supplier B"]),
        );
        let form_id = form.clone();
        dom.add_child(
            &form,
            roles::submit().primary().clone(),
            MockElement::new("button").on_click(move |dom| {
                let value = |role: ElementRole| dom.value_within(&form_id, role.primary()).unwrap_or_default();
                let record = vec![
                    "9".to_string(),
                    value(roles::field("name")),
                    value(roles::field("sku")),
                    value(roles::category()),
                    value(roles::supplier()),
                ];
                catalog.lock().unwrap().push(record);
                dom.navigate("http://shop.test/admin/products");
            }),
        );
    }

    fn session(catalog: &Catalog) -> MockSession {
        let catalog = Arc::clone(catalog);
        MockSession::new().with_route("/admin/products", move |dom| {
            let records = catalog.lock().unwrap().clone();
            render_list(dom, ResourceKind::Products, &records);
            dom.add(
                crate::pages::admin::table::roles::add_button(ResourceKind::Products)
                    .primary()
                    .clone(),
                MockElement::new("button"),
            );
            add_form(dom, &catalog);
        })
    }

    #[test]
    fn test_quick_form_defaults() {
        let form = ProductForm::quick("Lamp", "LMP-1");
        assert_eq!(form.price, Some(10_000.0));
        assert_eq!(form.quantity, Some(10));
        assert_eq!(form.category.as_deref(), Some("Category A"));
        assert_eq!(form.supplier.as_deref(), Some("Supplier B"));
        assert!(ProductForm::new().name.is_none());
    }

    #[tokio::test]
    async fn test_quick_add_appends_row() {
        let catalog: Catalog = Arc::new(Mutex::new(Vec::new()));
        let session = session(&catalog);
        let config = config();
        let page = ProductsPage::new(PageContext::new(&session, &config));
        page.navigate().await.unwrap();
        assert_eq!(page.row_count().await.unwrap(), 0);
        assert!(page.is_add_button_displayed().await.unwrap());

        page.add_product_quick("Lamp", "LMP-1").await.unwrap();
        assert_eq!(page.row_count().await.unwrap(), 1);
        assert_eq!(page.product_name(0).await.unwrap(), "Lamp");
        assert_eq!(page.product_sku(0).await.unwrap(), "LMP-1");
        assert_eq!(page.product_category(0).await.unwrap(), "Category A");
        assert_eq!(page.product_supplier(0).await.unwrap(), "Supplier B");
    }

    #[tokio::test]
    async fn test_modal_checks() {
        let catalog: Catalog = Arc::new(Mutex::new(Vec::new()));
        let session = session(&catalog);
        let config = config();
        let page = ProductsPage::new(PageContext::new(&session, &config));
        page.navigate().await.unwrap();
        page.click_add_button().await.unwrap();
        assert!(page.is_add_form_displayed().await.unwrap() || page.is_add_modal_displayed().await.unwrap());
        assert!(!page.is_error_message_displayed().await.unwrap());
    }
}
