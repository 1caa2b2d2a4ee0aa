//! Scripted booking session against in-memory collaborators

use anyhow::Context;
use booking_engine::{BookingStepController, Collaborators, Transition, setup_environment};
use chrono::{Duration, Local, NaiveTime};
use shared::models::{
    CatalogService, CustomerDetails, DiscountTiers, PackageSettings, SelectedService,
    ServiceCategory,
};

fn catalog_service(
    id: &str,
    name_en: &str,
    name_ar: &str,
    price: f64,
    duration: u32,
    order: i32,
) -> CatalogService {
    CatalogService {
        id: id.into(),
        name_en: name_en.into(),
        name_ar: name_ar.into(),
        price,
        duration,
        display_order: order,
    }
}

fn demo_catalog() -> Vec<ServiceCategory> {
    vec![
        ServiceCategory {
            id: "beard".into(),
            name_en: "Beard".into(),
            name_ar: "اللحية".into(),
            display_order: 2,
            services: vec![
                catalog_service("beard-trim", "Beard Trim", "تهذيب اللحية", 50.0, 20, 1),
                catalog_service(
                    "hot-towel",
                    "Hot Towel Shave",
                    "حلاقة بالمنشفة الساخنة",
                    70.0,
                    30,
                    2,
                ),
            ],
        },
        ServiceCategory {
            id: "hair".into(),
            name_en: "Hair".into(),
            name_ar: "الشعر".into(),
            display_order: 1,
            services: vec![
                catalog_service("wash", "Hair Wash", "غسيل الشعر", 40.0, 15, 2),
                catalog_service("haircut", "Signature Haircut", "قصة مميزة", 100.0, 45, 1),
            ],
        },
    ]
}

fn demo_upsells() -> Vec<SelectedService> {
    vec![SelectedService::from_catalog(&catalog_service(
        "beard-oil",
        "Beard Oil",
        "زيت اللحية",
        30.0,
        0,
        0,
    ))]
}

fn expect_moved(transition: &Transition, action: &str) -> anyhow::Result<()> {
    match transition {
        Transition::Moved(_) | Transition::DetourOpened(_) | Transition::Submitted(_) => Ok(()),
        other => anyhow::bail!("{action} did not advance: {other:?}"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 环境 (dotenv, 配置, 日志)
    let config = setup_environment();
    let locale = config.locale;

    tracing::info!("Booking engine demo starting...");

    // 2. 挂载向导
    let settings =
        PackageSettings::new("haircut", DiscountTiers::new(10, 15, 20)).with_max_services(3);
    let collaborators = Collaborators::in_memory(demo_catalog(), demo_upsells(), Some(settings));
    let controller = BookingStepController::mount(config, collaborators)
        .await
        .context("failed to mount booking wizard")?;

    // 3. 选择服务: 基础服务 + 两个附加项
    for id in ["haircut", "beard-trim", "wash"] {
        controller.toggle_service(id);
    }
    for item in controller.selection() {
        tracing::info!(service = item.display_name(locale), price = item.price, "Selected");
    }

    // 4. services → 套餐构建
    let transition = controller.next().await;
    expect_moved(&transition, "services")?;
    if let Transition::DetourOpened(_) = transition {
        let add_ons = vec!["beard-trim".to_string(), "wash".to_string()];
        expect_moved(&controller.confirm_package(&add_ons).await, "package confirm")?;
    }

    let totals = controller.totals();
    tracing::info!(
        subtotal = totals.subtotal,
        total = totals.total,
        savings = totals.savings,
        discount = totals.discount_percentage,
        "Package totals"
    );

    // 5. 日期、理发师、时间段
    let date = Local::now().date_naive() + Duration::days(1);
    controller.set_date(date);
    expect_moved(&controller.next().await, "datetime")?;

    controller.set_staff("barber-1");
    controller.set_time_slot(NaiveTime::from_hms_opt(10, 30, 0).context("invalid time slot")?);
    expect_moved(&controller.next().await, "barber")?;

    // 6. 顾客信息并提交
    controller.set_customer_details(CustomerDetails {
        name: "Demo Customer".into(),
        phone: "+966500000000".into(),
        email: "demo@example.com".into(),
        notes: String::new(),
    });
    controller.set_details_valid(true);
    expect_moved(&controller.next().await, "details")?;

    tracing::info!(state = ?controller.state(), "Booking demo finished");
    Ok(())
}
