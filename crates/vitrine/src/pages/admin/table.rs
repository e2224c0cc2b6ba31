//! Shared admin resource list view.
//!
//! The five back-office resources render the same layout: a page title and
//! card title reading "<Resource> Management", an add button opening
//! `#addRowModal`, a `table#add-row` of records and a search box. Edit and
//! delete are plain GET routes keyed by record id.

use crate::locator::Selector;
use crate::page_object::{PageContext, PageObject};
use crate::result::{VitrineError, VitrineResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Back-office resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Catalog products
    Products,
    /// Customer orders
    Orders,
    /// Registered customers
    Customers,
    /// Product categories
    Categories,
    /// Product suppliers
    Suppliers,
}

impl ResourceKind {
    /// Every resource, in sidebar order
    pub const ALL: [Self; 5] = [
        Self::Products,
        Self::Orders,
        Self::Customers,
        Self::Categories,
        Self::Suppliers,
    ];

    /// Plural slug used in admin URLs
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Orders => "orders",
            Self::Customers => "customers",
            Self::Categories => "categories",
            Self::Suppliers => "suppliers",
        }
    }

    /// Singular label used in headings and buttons
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Products => "Product",
            Self::Orders => "Order",
            Self::Customers => "Customer",
            Self::Categories => "Category",
            Self::Suppliers => "Supplier",
        }
    }

    /// List view path, e.g. `/admin/products`
    #[must_use]
    pub fn path(self) -> String {
        format!("/admin/{}", self.slug())
    }

    /// Heading text of the list view
    #[must_use]
    pub fn title(self) -> String {
        format!("{} Management", self.label())
    }

    /// Edit route prefix; customers have no edit page
    #[must_use]
    pub const fn edit_prefix(self) -> Option<&'static str> {
        match self {
            Self::Products => Some("/editProduct"),
            Self::Orders => Some("/editorder"),
            Self::Categories => Some("/editCategory"),
            Self::Suppliers => Some("/editSupplier"),
            Self::Customers => None,
        }
    }

    /// Delete route prefix; customers cannot be deleted
    #[must_use]
    pub const fn delete_prefix(self) -> Option<&'static str> {
        match self {
            Self::Products => Some("/deleteProduct"),
            Self::Orders => Some("/deleteOrder"),
            Self::Categories => Some("/delete"),
            Self::Suppliers => Some("/deleteSupplier"),
            Self::Customers => None,
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// Element roles of a resource list view
pub mod roles {
    use super::ResourceKind;
    use crate::locator::{ElementRole, Selector};

    /// Page heading, identifies the page
    #[must_use]
    pub fn page_title(kind: ResourceKind) -> ElementRole {
        ElementRole::new(
            kind.slug(),
            "page title",
            Selector::xpath(format!(
                "//h4[contains(@class,'page-title') and contains(text(),'{}')]",
                kind.title()
            )),
        )
    }

    /// Card heading above the table
    #[must_use]
    pub fn card_title(kind: ResourceKind) -> ElementRole {
        ElementRole::new(
            kind.slug(),
            "card title",
            Selector::xpath(format!(
                "//h4[contains(@class,'card-title') and contains(text(),'{}')]",
                kind.title()
            )),
        )
    }

    /// Button opening the add modal
    #[must_use]
    pub fn add_button(kind: ResourceKind) -> ElementRole {
        ElementRole::new(
            kind.slug(),
            "add button",
            Selector::xpath("//button[@data-target='#addRowModal']"),
        )
        .or(Selector::xpath(format!(
            "//button[contains(@class,'btn-primary') and contains(.,'Add {}')]",
            kind.label()
        )))
    }

    /// Records table
    #[must_use]
    pub fn table(kind: ResourceKind) -> ElementRole {
        ElementRole::new(kind.slug(), "table", Selector::xpath("//table[@id='add-row']"))
    }

    /// Records rows
    #[must_use]
    pub fn rows(kind: ResourceKind) -> ElementRole {
        ElementRole::new(kind.slug(), "rows", Selector::xpath("//table[@id='add-row']//tbody//tr"))
    }

    /// Search box
    #[must_use]
    pub fn search_input(kind: ResourceKind) -> ElementRole {
        ElementRole::new(
            kind.slug(),
            "search input",
            Selector::xpath("//input[@type='search' or @placeholder='Search' or @name='searchTerm']"),
        )
    }

    /// Edit button inside a row
    #[must_use]
    pub fn edit_button(kind: ResourceKind) -> ElementRole {
        ElementRole::new(
            kind.slug(),
            "edit button",
            Selector::xpath(".//button[contains(@title,'Edit') or contains(@class,'edit')]"),
        )
    }

    /// Cell `column` (1-based) of a row
    #[must_use]
    pub fn cell(kind: ResourceKind, column: usize) -> ElementRole {
        ElementRole::new(kind.slug(), "cell", Selector::xpath(format!("./td[{column}]")))
    }
}

/// One record as displayed in a list view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// Position in the table
    pub index: usize,
    /// Cell texts, left to right
    pub cells: Vec<String>,
}

impl TableRow {
    /// Cell text by 1-based column, matching `td[n]`
    #[must_use]
    pub fn column(&self, column: usize) -> Option<&str> {
        column
            .checked_sub(1)
            .and_then(|i| self.cells.get(i))
            .map(String::as_str)
    }
}

/// List view of one back-office resource
#[derive(Debug, Clone, Copy)]
pub struct ResourceTable<'a> {
    ctx: PageContext<'a>,
    kind: ResourceKind,
}

impl PageObject for ResourceTable<'_> {
    fn url_pattern(&self) -> &str {
        match self.kind {
            ResourceKind::Products => "/admin/products",
            ResourceKind::Orders => "/admin/orders",
            ResourceKind::Customers => "/admin/customers",
            ResourceKind::Categories => "/admin/categories",
            ResourceKind::Suppliers => "/admin/suppliers",
        }
    }

    fn page_name(&self) -> &str {
        self.kind.slug()
    }
}

impl<'a> ResourceTable<'a> {
    /// List view of `kind`
    #[must_use]
    pub const fn new(ctx: PageContext<'a>, kind: ResourceKind) -> Self {
        Self { ctx, kind }
    }

    /// Orders list view
    #[must_use]
    pub const fn orders(ctx: PageContext<'a>) -> Self {
        Self::new(ctx, ResourceKind::Orders)
    }

    /// Customers list view
    #[must_use]
    pub const fn customers(ctx: PageContext<'a>) -> Self {
        Self::new(ctx, ResourceKind::Customers)
    }

    /// Categories list view
    #[must_use]
    pub const fn categories(ctx: PageContext<'a>) -> Self {
        Self::new(ctx, ResourceKind::Categories)
    }

    /// Suppliers list view
    #[must_use]
    pub const fn suppliers(ctx: PageContext<'a>) -> Self {
        Self::new(ctx, ResourceKind::Suppliers)
    }

    /// Resource shown
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Shared page context
    #[must_use]
    pub const fn context(&self) -> PageContext<'a> {
        self.ctx
    }

    /// Open the list view and wait for its heading
    pub async fn navigate(&self) -> VitrineResult<()> {
        self.ctx
            .open(&self.kind.path(), &roles::page_title(self.kind))
            .await
    }

    /// Location is this list view
    pub async fn is_on_page(&self) -> VitrineResult<bool> {
        self.ctx.is_on(self).await
    }

    /// Page heading visible
    pub async fn is_page_title_displayed(&self) -> VitrineResult<bool> {
        self.ctx.is_displayed(&roles::page_title(self.kind)).await
    }

    /// Card heading visible
    pub async fn is_card_title_displayed(&self) -> VitrineResult<bool> {
        self.ctx.is_displayed(&roles::card_title(self.kind)).await
    }

    /// Add button visible (either markup convention)
    pub async fn is_add_button_displayed(&self) -> VitrineResult<bool> {
        self.ctx.is_displayed(&roles::add_button(self.kind)).await
    }

    /// Records table visible
    pub async fn is_table_displayed(&self) -> VitrineResult<bool> {
        self.ctx.is_displayed(&roles::table(self.kind)).await
    }

    /// Records listed; `0` when the table never shows
    pub async fn row_count(&self) -> VitrineResult<usize> {
        self.ctx
            .count(&roles::table(self.kind), &roles::rows(self.kind))
            .await
    }

    /// Every listed record with its cell texts.
    ///
    /// A table replaced mid-read is read once more; if that also goes stale
    /// the result is empty.
    pub async fn rows(&self) -> VitrineResult<Vec<TableRow>> {
        match self.read_rows().await {
            Err(e) if e.is_absence() => {
                debug!(resource = %self.kind, error = %e, "table replaced during read");
                match self.read_rows().await {
                    Err(e) if e.is_absence() => Ok(Vec::new()),
                    other => other,
                }
            }
            other => other,
        }
    }

    async fn read_rows(&self) -> VitrineResult<Vec<TableRow>> {
        let cells = Selector::xpath("./td");
        let mut out = Vec::new();
        for (index, row) in self.ctx.items(&roles::rows(self.kind)).await?.into_iter().enumerate() {
            let found = self.ctx.session().query_within(&row, &cells).await?;
            out.push(TableRow {
                index,
                cells: found.iter().map(|c| c.text().to_string()).collect(),
            });
        }
        Ok(out)
    }

    /// Text of cell `column` (1-based) in row `index`
    pub async fn cell_text(&self, index: usize, column: usize) -> VitrineResult<String> {
        let row = self.row_handle(index).await?;
        self.ctx
            .text_within(&row, &roles::cell(self.kind, column))
            .await
    }

    /// Open the add modal
    pub async fn click_add_button(&self) -> VitrineResult<()> {
        self.ctx.click(&roles::add_button(self.kind)).await
    }

    /// Click the edit button of row `index`
    pub async fn click_edit_button(&self, index: usize) -> VitrineResult<()> {
        let edit = roles::edit_button(self.kind);
        let row = self.row_handle(index).await?;
        let button = self.ctx.require_within(&row, &edit).await?;
        self.ctx.click_handle(&edit, &button).await
    }

    /// Load the edit route of a record
    pub async fn edit_by_id(&self, id: u64) -> VitrineResult<()> {
        let prefix = self.kind.edit_prefix().ok_or_else(|| self.unsupported("edit"))?;
        self.ctx.goto(&format!("{prefix}/{id}")).await
    }

    /// Load the delete route of a record
    pub async fn delete_by_id(&self, id: u64) -> VitrineResult<()> {
        let prefix = self
            .kind
            .delete_prefix()
            .ok_or_else(|| self.unsupported("delete"))?;
        self.ctx.goto(&format!("{prefix}/{id}")).await
    }

    /// Replace the search term, submit, and wait for the table to be replaced.
    /// Returns whether the rows changed.
    pub async fn search(&self, keyword: &str) -> VitrineResult<bool> {
        let rows = roles::rows(self.kind);
        let input = roles::search_input(self.kind);
        let before = self.ctx.snapshot(&rows).await?;
        self.ctx.fill(&input, keyword).await?;
        self.ctx.submit(&input).await?;
        self.ctx.await_refresh(&rows, &before).await
    }

    /// Handle of row `index`, fetched fresh
    pub(crate) async fn row_handle(&self, index: usize) -> VitrineResult<crate::driver::ElementHandle> {
        let rows = roles::rows(self.kind);
        self.ctx
            .items(&rows)
            .await?
            .into_iter()
            .nth(index)
            .ok_or_else(|| VitrineError::NotFound {
                role: format!("{} #{index}", rows.label()),
                strategies: rows.strategy_count(),
            })
    }

    fn unsupported(&self, action: &str) -> VitrineError {
        VitrineError::Navigation {
            url: self.ctx.url(&self.kind.path()),
            message: format!("{} records have no {action} route", self.kind.label()),
        }
    }
}
