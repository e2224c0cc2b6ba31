//! Back-office scenarios: authentication, dashboard and resource management.

use crate::assertion::Assertion;
use crate::pages::admin::dashboard::DASHBOARD_PATH;
use crate::pages::admin::{ProductForm, ResourceKind, ResourceTable};
use crate::pages::login::LOGIN_PATH;
use crate::scenario::{
    Scenario, ScenarioContext, ScenarioError, ScenarioResult, Suite, ADMIN_ID,
};
use futures::FutureExt;

/// The back-office catalog
#[must_use]
pub fn catalog() -> Vec<Scenario> {
    vec![
        // ---- authentication -----------------------------------------------
        Scenario::new(Suite::Admin, 1, "admin-login-success", "01. Admin - Đăng nhập thành công", |c| {
            login_success(c).boxed()
        }),
        Scenario::new(
            Suite::Admin,
            2,
            "admin-login-wrong-password",
            "02. Admin - Đăng nhập với mật khẩu sai",
            |c| login_wrong_password(c).boxed(),
        ),
        Scenario::new(
            Suite::Admin,
            21,
            "admin-login-non-admin",
            "02.1. Admin - Đăng nhập bằng tài khoản người dùng thường",
            |c| login_non_admin(c).boxed(),
        ),
        Scenario::new(
            Suite::Admin,
            22,
            "admin-direct-url-anonymous",
            "02.2. Admin - Kiểm tra truy cập URL Admin trực tiếp khi chưa đăng nhập",
            |c| direct_url_anonymous(c).boxed(),
        ),
        // ---- dashboard ----------------------------------------------------
        Scenario::new(
            Suite::Admin,
            3,
            "dashboard-elements",
            "03. Dashboard - Kiểm tra các thành phần chính",
            |c| dashboard_elements(c).boxed(),
        ),
        Scenario::new(
            Suite::Admin,
            4,
            "dashboard-administrator-role",
            "04. Dashboard - Kiểm tra role Administrator",
            |c| dashboard_role(c).boxed(),
        ),
        Scenario::new(
            Suite::Admin,
            5,
            "dashboard-navigation",
            "05. Navigation - Test navigation giữa các trang admin",
            |c| dashboard_navigation(c).boxed(),
        ),
        // ---- products -----------------------------------------------------
        Scenario::new(
            Suite::Admin,
            6,
            "products-navigate",
            "06. Products - Navigate đến trang Products",
            |c| navigate_to_list(c, ResourceKind::Products, true).boxed(),
        ),
        Scenario::new(
            Suite::Admin,
            7,
            "products-list",
            "07. Products - Xem danh sách sản phẩm",
            |c| view_list(c, ResourceKind::Products).boxed(),
        ),
        Scenario::new(
            Suite::Admin,
            8,
            "products-add-button",
            "08. Products - Kiểm tra nút Add Product",
            |c| add_button_shown(c, ResourceKind::Products).boxed(),
        ),
        Scenario::new(
            Suite::Admin,
            9,
            "products-add-form",
            "09. Products - Test form thêm mới",
            |c| products_add_form(c).boxed(),
        ),
        Scenario::new(
            Suite::Admin,
            10,
            "products-edit-route",
            "10. Products - Navigate đến trang Edit",
            |c| edit_route(c, ResourceKind::Products).boxed(),
        ),
        Scenario::new(
            Suite::Admin,
            11,
            "products-delete-route",
            "11. Products - Test Delete",
            |c| delete_route(c, ResourceKind::Products).boxed(),
        ),
        // ---- orders -------------------------------------------------------
        Scenario::new(
            Suite::Admin,
            12,
            "orders-navigate",
            "12. Orders - Navigate đến trang Orders",
            |c| navigate_to_list(c, ResourceKind::Orders, false).boxed(),
        ),
        Scenario::new(
            Suite::Admin,
            13,
            "orders-list",
            "13. Orders - Xem danh sách đơn hàng",
            |c| view_list(c, ResourceKind::Orders).boxed(),
        ),
        Scenario::new(
            Suite::Admin,
            14,
            "orders-export-link",
            "14. Orders - Kiểm tra link Export To Excel",
            |c| orders_export_link(c).boxed(),
        ),
        Scenario::new(
            Suite::Admin,
            15,
            "orders-edit-route",
            "15. Orders - Navigate đến trang Edit",
            |c| edit_route(c, ResourceKind::Orders).boxed(),
        ),
        Scenario::new(
            Suite::Admin,
            16,
            "orders-delete-route",
            "16. Orders - Test Delete",
            |c| delete_route(c, ResourceKind::Orders).boxed(),
        ),
        // ---- customers ----------------------------------------------------
        Scenario::new(
            Suite::Admin,
            17,
            "customers-navigate",
            "17. Customers - Navigate đến trang Customers",
            |c| navigate_to_list(c, ResourceKind::Customers, false).boxed(),
        ),
        Scenario::new(
            Suite::Admin,
            18,
            "customers-list",
            "18. Customers - Xem danh sách khách hàng",
            |c| view_list(c, ResourceKind::Customers).boxed(),
        ),
        // ---- categories ---------------------------------------------------
        Scenario::new(
            Suite::Admin,
            19,
            "categories-navigate",
            "19. Categories - Navigate đến trang Categories",
            |c| navigate_to_list(c, ResourceKind::Categories, false).boxed(),
        ),
        Scenario::new(
            Suite::Admin,
            20,
            "categories-list",
            "20. Categories - Xem danh sách danh mục",
            |c| view_list(c, ResourceKind::Categories).boxed(),
        ),
        Scenario::new(
            Suite::Admin,
            21,
            "categories-add-button",
            "21. Categories - Kiểm tra nút Add Category",
            |c| add_button_shown(c, ResourceKind::Categories).boxed(),
        ),
        Scenario::new(
            Suite::Admin,
            22,
            "categories-edit-route",
            "22. Categories - Navigate đến trang Edit",
            |c| edit_route(c, ResourceKind::Categories).boxed(),
        ),
        Scenario::new(
            Suite::Admin,
            23,
            "categories-delete-route",
            "23. Categories - Test Delete",
            |c| delete_route(c, ResourceKind::Categories).boxed(),
        ),
        // ---- suppliers ----------------------------------------------------
        Scenario::new(
            Suite::Admin,
            24,
            "suppliers-navigate",
            "24. Suppliers - Navigate đến trang Suppliers",
            |c| navigate_to_list(c, ResourceKind::Suppliers, false).boxed(),
        ),
        Scenario::new(
            Suite::Admin,
            25,
            "suppliers-list",
            "25. Suppliers - Xem danh sách nhà cung cấp",
            |c| view_list(c, ResourceKind::Suppliers).boxed(),
        ),
        Scenario::new(
            Suite::Admin,
            26,
            "suppliers-add-button",
            "26. Suppliers - Kiểm tra nút Add Supplier",
            |c| add_button_shown(c, ResourceKind::Suppliers).boxed(),
        ),
        Scenario::new(
            Suite::Admin,
            27,
            "suppliers-edit-route",
            "27. Suppliers - Navigate đến trang Edit",
            |c| edit_route(c, ResourceKind::Suppliers).boxed(),
        ),
        Scenario::new(
            Suite::Admin,
            28,
            "suppliers-delete-route",
            "28. Suppliers - Test Delete",
            |c| delete_route(c, ResourceKind::Suppliers).boxed(),
        ),
        // ---- list display and count ---------------------------------------
        Scenario::new(
            Suite::Admin,
            29,
            "products-display-count",
            "29. Products - Kiểm tra hiển thị danh sách và số lượng sản phẩm",
            |c| display_and_count(c, ResourceKind::Products).boxed(),
        ),
        Scenario::new(
            Suite::Admin,
            30,
            "categories-display-count",
            "30. Categories - Hiển thị danh sách và số lượng danh mục",
            |c| display_and_count(c, ResourceKind::Categories).boxed(),
        ),
        Scenario::new(
            Suite::Admin,
            31,
            "orders-display-count",
            "31. Orders - Hiển thị danh sách và số lượng đơn hàng",
            |c| display_and_count(c, ResourceKind::Orders).boxed(),
        ),
        Scenario::new(
            Suite::Admin,
            32,
            "orders-export",
            "32. Orders - Kiểm tra chức năng Xuất (Export) ra Excel",
            |c| orders_export(c).boxed(),
        ),
        Scenario::new(
            Suite::Admin,
            33,
            "customers-display-count",
            "33. Customers - Hiển thị danh sách và số lượng khách hàng",
            |c| display_and_count(c, ResourceKind::Customers).boxed(),
        ),
        // ---- product mutations --------------------------------------------
        Scenario::new(
            Suite::Admin,
            34,
            "products-edit-category-supplier",
            "34. Products - Sửa danh mục/nhà cung cấp thành công (UPDATE)",
            |c| products_edit_category_supplier(c).boxed(),
        ),
        Scenario::new(
            Suite::Admin,
            35,
            "products-search-name",
            "35. Products - Tìm kiếm sản phẩm theo Tên (Search)",
            |c| products_search(c, SearchBy::Name).boxed(),
        ),
        Scenario::new(
            Suite::Admin,
            36,
            "products-search-sku",
            "36. Products - Tìm kiếm sản phẩm theo SKU (Search)",
            |c| products_search(c, SearchBy::Sku).boxed(),
        ),
    ]
}

// =============================================================================
// MESSAGES
// =============================================================================

/// Literal texts per resource
struct Texts {
    /// Lowercase Vietnamese noun ("sản phẩm")
    noun: &'static str,
    /// Capitalised noun used in the management page title ("Sản phẩm")
    title_noun: &'static str,
    /// Table missing message
    table_missing: &'static str,
    /// Lowercase English plural used in redirect messages ("products")
    plural: &'static str,
}

const fn texts(kind: ResourceKind) -> Texts {
    match kind {
        ResourceKind::Products => Texts {
            noun: "sản phẩm",
            title_noun: "Sản phẩm",
            table_missing: "Bảng sản phẩm không hiển thị",
            plural: "products",
        },
        ResourceKind::Orders => Texts {
            noun: "đơn hàng",
            title_noun: "Đơn hàng",
            table_missing: "Bảng đơn hàng không hiển thị",
            plural: "orders",
        },
        ResourceKind::Customers => Texts {
            noun: "khách hàng",
            title_noun: "Khách hàng",
            table_missing: "Bảng khách hàng không hiển thị",
            plural: "customers",
        },
        ResourceKind::Categories => Texts {
            noun: "danh mục",
            title_noun: "Danh mục",
            table_missing: "Bảng danh mục không hiển thị",
            plural: "categories",
        },
        ResourceKind::Suppliers => Texts {
            noun: "nhà cung cấp",
            title_noun: "Nhà cung cấp",
            table_missing: "Bảng nhà cung cấp không hiển thị",
            plural: "suppliers",
        },
    }
}

// =============================================================================
// AUTHENTICATION
// =============================================================================

async fn login_success(ctx: &ScenarioContext) -> ScenarioResult {
    ctx.info(&format!("Bắt đầu test đăng nhập admin với username: {ADMIN_ID}"));
    ctx.login_as_admin().await?;
    let page = ctx.page();
    page.wait_for_url(DASHBOARD_PATH).await?;
    let url = page.current_url().await?;
    Assertion::is_true(
        url.contains(DASHBOARD_PATH),
        &format!(
            "Đăng nhập admin thành công nhưng không redirect về trang admin dashboard. URL hiện tại: {url}"
        ),
    )
    .check()
}

async fn login_wrong_password(ctx: &ScenarioContext) -> ScenarioResult {
    ctx.info("Bắt đầu test đăng nhập admin với mật khẩu sai");
    ctx.login_as(ADMIN_ID, "wrong_password").await?;
    let page = ctx.login_page();
    Assertion::is_true(
        page.is_error_alert_displayed().await?,
        "Không hiển thị thông báo lỗi khi đăng nhập với mật khẩu sai",
    )
    .check()?;
    let text = page.error_alert_text().await?;
    Assertion::contains_any(
        &text,
        &["không chính xác", "Tài khoản", "sai"],
        "Thông báo lỗi không đúng",
    )
    .check()
}

async fn login_non_admin(ctx: &ScenarioContext) -> ScenarioResult {
    ctx.info("Bắt đầu test đăng nhập admin bằng tài khoản User thường");
    ctx.login_as_user().await?;
    let url = ctx.page().current_url().await?;
    Assertion::is_false(
        url.contains(DASHBOARD_PATH),
        "Tài khoản User thường truy cập được trang Admin Dashboard. Lỗi bảo mật nghiêm trọng!",
    )
    .check()
}

async fn direct_url_anonymous(ctx: &ScenarioContext) -> ScenarioResult {
    ctx.info("Bắt đầu test truy cập Admin URL khi chưa đăng nhập");
    let page = ctx.page();
    page.goto(&ResourceKind::Products.path()).await?;
    Assertion::is_true(
        page.wait_for_url(LOGIN_PATH).await?,
        "Truy cập Admin URL khi chưa đăng nhập nhưng không redirect về Login. Lỗi bảo mật!",
    )
    .check()
}

// =============================================================================
// DASHBOARD
// =============================================================================

async fn login_to_dashboard(ctx: &ScenarioContext) -> ScenarioResult {
    ctx.login_as_admin().await?;
    ctx.page().wait_for_url(DASHBOARD_PATH).await?;
    Ok(())
}

async fn dashboard_elements(ctx: &ScenarioContext) -> ScenarioResult {
    ctx.info("Bắt đầu test kiểm tra các thành phần trên trang admin dashboard");
    login_to_dashboard(ctx).await?;
    let dashboard = ctx.dashboard();
    Assertion::is_true(dashboard.is_on_admin_dashboard().await?, "Không ở trang admin dashboard")
        .check()?;
    Assertion::is_true(
        dashboard.is_dashboard_title_displayed().await?,
        "Không hiển thị tiêu đề Dashboard",
    )
    .check()?;
    Assertion::is_true(
        dashboard.is_admin_dashboard_subtitle_displayed().await?,
        "Không hiển thị subtitle 'Admin Dashboard'",
    )
    .check()?;
    Assertion::is_true(
        dashboard.is_overall_statistics_card_displayed().await?,
        "Không hiển thị card 'Overall statistics'",
    )
    .check()?;
    Assertion::is_true(
        dashboard.is_total_income_card_displayed().await?,
        "Không hiển thị card 'Total income & spend statistics'",
    )
    .check()?;
    Assertion::is_true(
        dashboard.is_user_statistics_card_displayed().await?,
        "Không hiển thị card 'User Statistics'",
    )
    .check()?;
    Assertion::is_true(
        dashboard.is_daily_sales_card_displayed().await?,
        "Không hiển thị card 'Daily Sales'",
    )
    .check()
}

async fn dashboard_role(ctx: &ScenarioContext) -> ScenarioResult {
    ctx.info("Bắt đầu test kiểm tra hiển thị role Administrator");
    login_to_dashboard(ctx).await?;
    Assertion::is_true(
        ctx.dashboard().is_administrator_role_displayed().await?,
        "Không hiển thị role Administrator trên navbar",
    )
    .check()
}

async fn dashboard_navigation(ctx: &ScenarioContext) -> ScenarioResult {
    ctx.info("Bắt đầu test navigation giữa các trang admin");
    login_to_dashboard(ctx).await?;
    let dashboard = ctx.dashboard();
    for (kind, name) in [
        (ResourceKind::Products, "Products"),
        (ResourceKind::Orders, "Orders"),
        (ResourceKind::Customers, "Customers"),
        (ResourceKind::Categories, "Categories"),
        (ResourceKind::Suppliers, "Suppliers"),
    ] {
        dashboard.click_resource_link(kind).await?;
        Assertion::is_true(
            ctx.page().url_contains(&kind.path()).await?,
            &format!("Navigation đến {name} không thành công"),
        )
        .check()?;
    }
    Ok(())
}

// =============================================================================
// RESOURCE LISTS
// =============================================================================

/// Log in and open a resource list
async fn open_list(ctx: &ScenarioContext, kind: ResourceKind) -> ScenarioResult<ResourceTable<'_>> {
    ctx.login_as_admin().await?;
    let table = ResourceTable::new(ctx.page(), kind);
    table.navigate().await?;
    Ok(table)
}

async fn navigate_to_list(ctx: &ScenarioContext, kind: ResourceKind, card: bool) -> ScenarioResult {
    ctx.info(&format!(
        "Bắt đầu test navigation đến trang {}",
        kind.title()
    ));
    let table = open_list(ctx, kind).await?;
    Assertion::is_true(
        table.is_on_page().await?,
        &format!("Không ở trang {}", kind.title()),
    )
    .check()?;
    Assertion::is_true(table.is_page_title_displayed().await?, "Không hiển thị page title").check()?;
    if card {
        Assertion::is_true(table.is_card_title_displayed().await?, "Không hiển thị card title")
            .check()?;
    }
    Ok(())
}

async fn view_list(ctx: &ScenarioContext, kind: ResourceKind) -> ScenarioResult {
    let t = texts(kind);
    ctx.info(&format!("Bắt đầu test xem danh sách {}", t.noun));
    let table = open_list(ctx, kind).await?;
    Assertion::is_true(table.is_table_displayed().await?, t.table_missing).check()?;
    let count = table.row_count().await?;
    ctx.info(&format!("Số lượng {}: {count}", t.noun));
    Ok(())
}

async fn add_button_shown(ctx: &ScenarioContext, kind: ResourceKind) -> ScenarioResult {
    ctx.info(&format!("Bắt đầu test kiểm tra nút Add {}", kind.label()));
    let table = open_list(ctx, kind).await?;
    Assertion::is_true(
        table.is_add_button_displayed().await?,
        &format!("Nút Add {} không hiển thị", kind.label()),
    )
    .check()
}

async fn edit_route(ctx: &ScenarioContext, kind: ResourceKind) -> ScenarioResult {
    let t = texts(kind);
    let Some(prefix) = kind.edit_prefix() else {
        return Err(ScenarioError::skip(format!(
            "{} không có trang edit",
            kind.label()
        )));
    };
    ctx.info(&format!("Bắt đầu test navigate đến trang edit {}", t.noun));
    let table = open_list(ctx, kind).await?;
    ctx.require_rows(
        table.row_count().await?,
        &format!("Không có {} để test edit", t.noun),
    )?;

    table.edit_by_id(1).await?;
    Assertion::is_true(
        ctx.page().url_contains(prefix).await?,
        &format!("Không navigate đến trang edit {}", t.noun),
    )
    .check()
}

async fn delete_route(ctx: &ScenarioContext, kind: ResourceKind) -> ScenarioResult {
    let t = texts(kind);
    ctx.info(&format!("Bắt đầu test delete {}", t.noun));
    let table = open_list(ctx, kind).await?;
    ctx.require_rows(
        table.row_count().await?,
        &format!("Không có {} để test delete", t.noun),
    )?;

    table.delete_by_id(999).await?;
    table.navigate().await?;
    Assertion::is_true(
        ctx.page().url_contains(&kind.path()).await?,
        &format!("Không redirect về trang {} sau khi delete", t.plural),
    )
    .check()
}

async fn display_and_count(ctx: &ScenarioContext, kind: ResourceKind) -> ScenarioResult {
    let t = texts(kind);
    ctx.info(&format!(
        "Bắt đầu test hiển thị danh sách {} trong Admin",
        t.title_noun
    ));
    let table = open_list(ctx, kind).await?;
    Assertion::is_true(
        table.is_page_title_displayed().await?,
        &format!("Không ở trên trang Quản lý {} Admin", t.title_noun),
    )
    .check()?;
    let count = table.row_count().await?;
    Assertion::at_least(count, 0, &format!("Không thể đếm số lượng {}", t.noun)).check()?;
    ctx.info(&format!(
        "Danh sách {} hiển thị thành công với {count} {}.",
        t.noun, t.noun
    ));
    Ok(())
}

// =============================================================================
// PRODUCTS AND ORDERS
// =============================================================================

async fn products_add_form(ctx: &ScenarioContext) -> ScenarioResult {
    ctx.info("Bắt đầu test form thêm sản phẩm");
    ctx.login_as_admin().await?;
    let products = ctx.products();
    products.navigate().await?;
    products.click_add_button().await?;
    let shown = products.is_add_form_displayed().await? || products.is_add_modal_displayed().await?;
    Assertion::is_true(shown, "Form thêm sản phẩm không hiển thị").check()
}

async fn orders_export_link(ctx: &ScenarioContext) -> ScenarioResult {
    ctx.info("Bắt đầu test kiểm tra link Export To Excel");
    ctx.login_as_admin().await?;
    let orders = ctx.orders();
    orders.navigate().await?;
    Assertion::is_true(
        orders.is_export_link_displayed().await?,
        "Link Export To Excel không hiển thị",
    )
    .check()
}

async fn orders_export(ctx: &ScenarioContext) -> ScenarioResult {
    ctx.info("Bắt đầu test chức năng Xuất đơn hàng ra Excel");
    ctx.login_as_admin().await?;
    let orders = ctx.orders();
    orders.navigate().await?;
    Assertion::is_true(
        orders.is_export_link_displayed().await?,
        "Không tìm thấy nút 'Export To Excel'",
    )
    .check()?;
    orders.click_export_link().await?;
    Assertion::is_true(
        orders.is_on_page().await?,
        "Bị redirect khỏi trang Orders sau khi nhấn Export",
    )
    .check()
}

async fn products_edit_category_supplier(ctx: &ScenarioContext) -> ScenarioResult {
    ctx.info("Bắt đầu test sửa Danh mục và Nhà cung cấp của Sản phẩm");
    ctx.login_as_admin().await?;
    let products = ctx.products();
    products.navigate().await?;
    ctx.require_rows(
        products.row_count().await?,
        "Không có sản phẩm để test sửa danh mục/NCC",
    )?;

    products.click_edit_button(0).await?;
    let form = ProductForm::new().category("Category B").supplier("Supplier A");
    products.fill_edit_form(&form).await?;
    products.submit_edit_form().await?;

    products.navigate().await?;
    Assertion::equals(
        &"Category B".to_string(),
        &products.product_category(0).await?,
        "Danh mục sản phẩm không được cập nhật đúng",
    )
    .check()?;
    Assertion::equals(
        &"Supplier A".to_string(),
        &products.product_supplier(0).await?,
        "Nhà cung cấp sản phẩm không được cập nhật đúng",
    )
    .check()
}

#[derive(Debug, Clone, Copy)]
enum SearchBy {
    Name,
    Sku,
}

async fn products_search(ctx: &ScenarioContext, by: SearchBy) -> ScenarioResult {
    let (start, skip, empty) = match by {
        SearchBy::Name => (
            "Bắt đầu test tìm kiếm sản phẩm theo Tên",
            "Không có sản phẩm để test tìm kiếm",
            "Tìm kiếm sản phẩm không trả về kết quả",
        ),
        SearchBy::Sku => (
            "Bắt đầu test tìm kiếm sản phẩm theo SKU",
            "Không có sản phẩm để test tìm kiếm theo SKU",
            "Tìm kiếm sản phẩm theo SKU không trả về kết quả",
        ),
    };
    ctx.info(start);
    ctx.login_as_admin().await?;
    let products = ctx.products();
    products.navigate().await?;
    ctx.require_rows(products.row_count().await?, skip)?;

    let keyword = match by {
        SearchBy::Name => products.product_name(0).await?,
        SearchBy::Sku => products.product_sku(0).await?,
    };
    if keyword.is_empty() {
        return Err(ScenarioError::skip(skip));
    }
    products.search(&keyword).await?;
    Assertion::at_least(products.row_count().await?, 1, empty).check()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::{TestConfig, Timeouts};
    use crate::data::UniqueDataGenerator;
    use crate::mock::MockSession;
    use crate::reporter::MemorySink;
    use crate::scenario::ScenarioOutcome;
    use std::sync::Arc;

    fn context(session: MockSession) -> ScenarioContext {
        let config = TestConfig::new("http://shop.test").with_timeouts(Timeouts {
            element_ms: 40,
            navigation_ms: 40,
            settle_ms: 40,
            poll_ms: 5,
        });
        ScenarioContext::new(
            Box::new(session),
            Arc::new(config),
            Arc::new(UniqueDataGenerator::with_prefix("t")),
            Arc::new(MemorySink::default()),
        )
    }

    mod route_tests {
        use super::*;

        #[tokio::test]
        async fn test_edit_route_without_edit_page_skips() {
            let ctx = context(MockSession::new());
            let outcome = ScenarioOutcome::from(edit_route(&ctx, ResourceKind::Customers).await);
            match outcome {
                ScenarioOutcome::Skipped(reason) => assert!(reason.contains(ResourceKind::Customers.label())),
                other => panic!("unexpected {other:?}"),
            }
        }

        #[tokio::test]
        async fn test_edit_route_on_blank_storefront_fails() {
            let ctx = context(MockSession::new());
            let outcome = ScenarioOutcome::from(edit_route(&ctx, ResourceKind::Categories).await);
            assert!(matches!(outcome, ScenarioOutcome::Failed(_)));
        }

        #[test]
        fn test_only_customers_lack_an_edit_page() {
            let missing: Vec<_> = [
                ResourceKind::Products,
                ResourceKind::Orders,
                ResourceKind::Categories,
                ResourceKind::Suppliers,
                ResourceKind::Customers,
            ]
            .into_iter()
            .filter(|k| k.edit_prefix().is_none())
            .collect();
            assert_eq!(missing, vec![ResourceKind::Customers]);
        }
    }
}
