//! Admin orders list view.

use super::table::{ResourceKind, ResourceTable};
use crate::page_object::PageContext;
use crate::result::VitrineResult;
use std::ops::Deref;

/// Element roles specific to the orders view
pub mod roles {
    use crate::locator::{ElementRole, Selector};

    /// Spreadsheet export link
    #[must_use]
    pub fn export_link() -> ElementRole {
        ElementRole::new("orders", "export link", Selector::xpath("//a[contains(.,'Export To Excel')]"))
            .or(Selector::css("a[href*='export']"))
    }
}

/// Orders list view
#[derive(Debug, Clone, Copy)]
pub struct OrdersPage<'a> {
    table: ResourceTable<'a>,
}

impl<'a> Deref for OrdersPage<'a> {
    type Target = ResourceTable<'a>;

    fn deref(&self) -> &Self::Target {
        &self.table
    }
}

impl<'a> OrdersPage<'a> {
    /// Bind to a scenario's context
    #[must_use]
    pub const fn new(ctx: PageContext<'a>) -> Self {
        Self {
            table: ResourceTable::new(ctx, ResourceKind::Orders),
        }
    }

    /// Export link visible
    pub async fn is_export_link_displayed(&self) -> VitrineResult<bool> {
        self.context().is_displayed(&roles::export_link()).await
    }

    /// Trigger the export; the download does not navigate
    pub async fn click_export_link(&self) -> VitrineResult<()> {
        self.context().click(&roles::export_link()).await
    }
}
