//! Admin dashboard (`/admin/home`).

use super::table::ResourceKind;
use crate::page_object::{PageContext, PageObject};
use crate::result::VitrineResult;
use tracing::debug;

/// Path of the dashboard
pub const DASHBOARD_PATH: &str = "/admin/home";

/// Element roles of the dashboard
pub mod roles {
    use super::ResourceKind;
    use crate::locator::{ElementRole, Selector};

    const PAGE: &str = "dashboard";

    /// Page heading
    #[must_use]
    pub fn title() -> ElementRole {
        ElementRole::new(
            PAGE,
            "title",
            Selector::xpath("//h4[contains(@class,'page-title') and contains(text(),'Dashboard')]"),
        )
    }

    /// "Admin Dashboard" subtitle
    #[must_use]
    pub fn subtitle() -> ElementRole {
        ElementRole::new(PAGE, "subtitle", Selector::xpath("//h5[contains(.,'Admin Dashboard')]"))
            .or(Selector::xpath("//*[contains(@class,'op-7') and contains(.,'Admin Dashboard')]"))
    }

    fn card(name: &'static str, heading: &str) -> ElementRole {
        ElementRole::new(
            PAGE,
            name,
            Selector::xpath(format!(
                "//div[contains(@class,'card-title') and contains(.,'{heading}')]"
            )),
        )
    }

    /// Overall statistics card
    #[must_use]
    pub fn overall_statistics() -> ElementRole {
        card("overall statistics card", "Overall statistics")
    }

    /// Income and spend card
    #[must_use]
    pub fn total_income() -> ElementRole {
        card("total income card", "Total income & spend statistics")
    }

    /// User statistics card
    #[must_use]
    pub fn user_statistics() -> ElementRole {
        card("user statistics card", "User Statistics")
    }

    /// Daily sales card
    #[must_use]
    pub fn daily_sales() -> ElementRole {
        card("daily sales card", "Daily Sales")
    }

    /// Role badge in the navbar
    #[must_use]
    pub fn administrator_role() -> ElementRole {
        ElementRole::new(
            PAGE,
            "administrator role",
            Selector::xpath("//span[contains(@class,'user-level') and contains(.,'Administrator')]"),
        )
        .or(Selector::xpath("//*[contains(text(),'Administrator')]"))
    }

    /// Sidebar link to a resource list
    #[must_use]
    pub fn sidebar_link(kind: ResourceKind) -> ElementRole {
        ElementRole::new(
            PAGE,
            "sidebar link",
            Selector::css(format!("a[href='/admin/{}']", kind.slug())),
        )
        .or(Selector::xpath(format!(
            "//ul[contains(@class,'nav')]//a[contains(@href,'{}')]",
            kind.slug()
        )))
    }
}

/// Admin dashboard
#[derive(Debug, Clone, Copy)]
pub struct DashboardPage<'a> {
    ctx: PageContext<'a>,
}

impl PageObject for DashboardPage<'_> {
    fn url_pattern(&self) -> &str {
        DASHBOARD_PATH
    }

    fn page_name(&self) -> &str {
        "dashboard"
    }
}

impl<'a> DashboardPage<'a> {
    /// Bind to a scenario's context
    #[must_use]
    pub const fn new(ctx: PageContext<'a>) -> Self {
        Self { ctx }
    }

    /// Open the dashboard
    pub async fn navigate(&self) -> VitrineResult<()> {
        self.ctx.open(DASHBOARD_PATH, &roles::title()).await
    }

    /// Location is the dashboard
    pub async fn is_on_admin_dashboard(&self) -> VitrineResult<bool> {
        self.ctx.is_on(self).await
    }

    /// Heading visible
    pub async fn is_dashboard_title_displayed(&self) -> VitrineResult<bool> {
        self.ctx.is_displayed(&roles::title()).await
    }

    /// Subtitle visible
    pub async fn is_admin_dashboard_subtitle_displayed(&self) -> VitrineResult<bool> {
        self.ctx.is_displayed(&roles::subtitle()).await
    }

    /// Overall statistics card visible
    pub async fn is_overall_statistics_card_displayed(&self) -> VitrineResult<bool> {
        self.ctx.is_displayed(&roles::overall_statistics()).await
    }

    /// Income card visible
    pub async fn is_total_income_card_displayed(&self) -> VitrineResult<bool> {
        self.ctx.is_displayed(&roles::total_income()).await
    }

    /// User statistics card visible
    pub async fn is_user_statistics_card_displayed(&self) -> VitrineResult<bool> {
        self.ctx.is_displayed(&roles::user_statistics()).await
    }

    /// Daily sales card visible
    pub async fn is_daily_sales_card_displayed(&self) -> VitrineResult<bool> {
        self.ctx.is_displayed(&roles::daily_sales()).await
    }

    /// Administrator badge visible
    pub async fn is_administrator_role_displayed(&self) -> VitrineResult<bool> {
        self.ctx.is_displayed(&roles::administrator_role()).await
    }

    /// Follow a sidebar link and wait for the resource URL
    pub async fn click_resource_link(&self, kind: ResourceKind) -> VitrineResult<()> {
        self.ctx.click(&roles::sidebar_link(kind)).await?;
        if !self.ctx.wait_for_url(&kind.path()).await? {
            debug!(%kind, "sidebar link did not reach its resource");
        }
        Ok(())
    }
}
