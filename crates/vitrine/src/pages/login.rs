//! Login / Register page.
//!
//! Both forms live on `/login`; the register form sits behind a sign-up tab.
//! Outcomes surface as an alert (success or error) or as a redirect away
//! from `/login`.

use crate::config::url_path;
use crate::page_object::{PageContext, PageObject};
use crate::result::VitrineResult;
use tracing::debug;

/// Path of the login page
pub const LOGIN_PATH: &str = "/login";

/// Element roles of the login page
pub mod roles {
    use crate::locator::{ElementRole, Selector};

    const PAGE: &str = "login";

    /// Sign-in form, identifies the page
    #[must_use]
    pub fn sign_in_form() -> ElementRole {
        ElementRole::new(PAGE, "sign-in form", Selector::css("form[action='/login']"))
            .or(Selector::xpath("//form[.//input[@name='customerId'] and .//input[@type='password']]"))
    }

    /// Customer id input of the sign-in form
    #[must_use]
    pub fn customer_id() -> ElementRole {
        ElementRole::new(
            PAGE,
            "customer id input",
            Selector::css("form[action='/login'] input[name='customerId']"),
        )
        .or(Selector::css("#customerId"))
    }

    /// Password input of the sign-in form
    #[must_use]
    pub fn password() -> ElementRole {
        ElementRole::new(
            PAGE,
            "password input",
            Selector::css("form[action='/login'] input[name='password']"),
        )
        .or(Selector::css("#password"))
    }

    /// Sign-in submit button
    #[must_use]
    pub fn sign_in_button() -> ElementRole {
        ElementRole::new(
            PAGE,
            "sign-in button",
            Selector::css("form[action='/login'] button[type='submit']"),
        )
        .or(Selector::xpath("//button[contains(.,'Đăng nhập') or contains(.,'Sign In')]"))
    }

    /// Tab revealing the register form
    #[must_use]
    pub fn sign_up_tab() -> ElementRole {
        ElementRole::new(PAGE, "sign-up tab", Selector::css("#signUp"))
            .or(Selector::xpath("//button[contains(.,'Sign Up') or contains(.,'Đăng ký')]"))
    }

    /// Register customer id input
    #[must_use]
    pub fn register_customer_id() -> ElementRole {
        ElementRole::new(
            PAGE,
            "register customer id input",
            Selector::css("form[action='/register'] input[name='customerId']"),
        )
    }

    /// Register full name input
    #[must_use]
    pub fn register_fullname() -> ElementRole {
        ElementRole::new(
            PAGE,
            "register fullname input",
            Selector::css("form[action='/register'] input[name='fullname']"),
        )
    }

    /// Register email input
    #[must_use]
    pub fn register_email() -> ElementRole {
        ElementRole::new(
            PAGE,
            "register email input",
            Selector::css("form[action='/register'] input[name='email']"),
        )
    }

    /// Register password input
    #[must_use]
    pub fn register_password() -> ElementRole {
        ElementRole::new(
            PAGE,
            "register password input",
            Selector::css("form[action='/register'] input[name='password']"),
        )
    }

    /// Register submit button
    #[must_use]
    pub fn sign_up_button() -> ElementRole {
        ElementRole::new(
            PAGE,
            "sign-up button",
            Selector::css("form[action='/register'] button[type='submit']"),
        )
        .or(Selector::xpath("//form[@action='/register']//button"))
    }

    /// Success alert
    #[must_use]
    pub fn success_alert() -> ElementRole {
        ElementRole::new(PAGE, "success alert", Selector::css(".alert-success"))
            .or(Selector::css(".alert.alert-info"))
    }

    /// Error alert
    #[must_use]
    pub fn error_alert() -> ElementRole {
        ElementRole::new(PAGE, "error alert", Selector::css(".alert-danger"))
            .or(Selector::css(".alert-error"))
    }
}

/// Login / Register page
#[derive(Debug, Clone, Copy)]
pub struct LoginPage<'a> {
    ctx: PageContext<'a>,
}

impl PageObject for LoginPage<'_> {
    fn url_pattern(&self) -> &str {
        LOGIN_PATH
    }

    fn page_name(&self) -> &str {
        "login"
    }
}

impl<'a> LoginPage<'a> {
    /// Bind to a scenario's context
    #[must_use]
    pub const fn new(ctx: PageContext<'a>) -> Self {
        Self { ctx }
    }

    /// Open `/login`
    pub async fn navigate(&self) -> VitrineResult<()> {
        self.ctx.open(LOGIN_PATH, &roles::sign_in_form()).await
    }

    /// Fill and submit the sign-in form, then wait for a redirect or an alert
    pub async fn login(&self, customer_id: &str, password: &str) -> VitrineResult<()> {
        self.ctx.fill(&roles::customer_id(), customer_id).await?;
        self.ctx.fill(&roles::password(), password).await?;
        self.ctx.click(&roles::sign_in_button()).await?;
        self.await_outcome().await
    }

    /// Full registration through the sign-up tab
    pub async fn register(
        &self,
        customer_id: &str,
        fullname: &str,
        email: &str,
        password: &str,
    ) -> VitrineResult<()> {
        self.click_sign_up_tab().await?;
        self.enter_register_customer_id(customer_id).await?;
        self.enter_register_fullname(fullname).await?;
        self.enter_register_email(email).await?;
        self.enter_register_password(password).await?;
        self.click_sign_up_button().await
    }

    /// Reveal the register form
    pub async fn click_sign_up_tab(&self) -> VitrineResult<()> {
        self.ctx.click(&roles::sign_up_tab()).await
    }

    /// Type the register customer id
    pub async fn enter_register_customer_id(&self, value: &str) -> VitrineResult<()> {
        self.ctx.fill(&roles::register_customer_id(), value).await
    }

    /// Type the register full name
    pub async fn enter_register_fullname(&self, value: &str) -> VitrineResult<()> {
        self.ctx.fill(&roles::register_fullname(), value).await
    }

    /// Type the register email
    pub async fn enter_register_email(&self, value: &str) -> VitrineResult<()> {
        self.ctx.fill(&roles::register_email(), value).await
    }

    /// Type the register password
    pub async fn enter_register_password(&self, value: &str) -> VitrineResult<()> {
        self.ctx.fill(&roles::register_password(), value).await
    }

    /// Submit the register form and wait for a redirect or an alert
    pub async fn click_sign_up_button(&self) -> VitrineResult<()> {
        self.ctx.click(&roles::sign_up_button()).await?;
        self.await_outcome().await
    }

    /// Success alert visible
    pub async fn is_success_alert_displayed(&self) -> VitrineResult<bool> {
        self.ctx.is_displayed(&roles::success_alert()).await
    }

    /// Success alert text
    pub async fn success_alert_text(&self) -> VitrineResult<String> {
        self.ctx.text(&roles::success_alert()).await
    }

    /// Error alert visible
    pub async fn is_error_alert_displayed(&self) -> VitrineResult<bool> {
        self.ctx.is_displayed(&roles::error_alert()).await
    }

    /// Error alert text
    pub async fn error_alert_text(&self) -> VitrineResult<String> {
        self.ctx.text(&roles::error_alert()).await
    }

    /// Location is the login page
    pub async fn is_on_login_page(&self) -> VitrineResult<bool> {
        self.ctx.is_on(self).await
    }

    /// Location is the storefront home page
    pub async fn is_on_home_page(&self) -> VitrineResult<bool> {
        let url = self.ctx.current_url().await?;
        Ok(is_home_path(url_path(&url)))
    }

    // Submitting either form either redirects or renders an alert; an
    // untouched form (client-side validation) runs the post-action budget out.
    async fn await_outcome(&self) -> VitrineResult<()> {
        let ctx = self.ctx;
        let success = roles::success_alert();
        let error = roles::error_alert();
        let outcome = ctx
            .waiter()
            .until("login outcome", ctx.config().timeouts.settle(), || {
                let (success, error) = (&success, &error);
                async move {
                    if !ctx.url_contains(LOGIN_PATH).await? {
                        return Ok(Some(()));
                    }
                    let alerted =
                        ctx.is_present_now(success).await? || ctx.is_present_now(error).await?;
                    Ok(alerted.then_some(()))
                }
            })
            .await?;
        if !outcome.is_satisfied() {
            debug!("form submitted without redirect or alert");
        }
        Ok(())
    }
}

fn is_home_path(path: &str) -> bool {
    path == "/" || path.starts_with("/home") || path.starts_with("/index")
}
