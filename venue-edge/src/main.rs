use anyhow::Context;
use rust_decimal::Decimal;
use shared::models::{Event, Floor, FloorTable, OwnerContext, ReservationDraft};
use std::sync::Arc;
use venue_edge::{
    BackgroundTasks, Config, CurrentUser, DocumentStore, ExpirySweeper, GuestStore,
    HeadlessDialogs, InMemoryStore, RecordingNotifier, ReservationCoordinator, TaskKind,
    init_logger_with_file, print_banner,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 环境与日志
    let config = Config::load();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    print_banner();
    tracing::info!(environment = %config.environment, "Venue edge starting...");

    // 2. 存储与演示数据
    let store = Arc::new(InMemoryStore::new());
    let owner = OwnerContext::new("demo-org", "demo-property", "tonight");
    let event = Event {
        id: owner.event_id.clone(),
        name: "Tonight".into(),
        date: chrono::Local::now().date_naive(),
        start_time: "21:00".into(),
    };
    let floor = Floor {
        id: "main".into(),
        name: "Main floor".into(),
        tables: ["T1", "T2", "T3", "T4"].into_iter().map(FloorTable::new).collect(),
    };
    let admin = CurrentUser {
        id: "admin".into(),
        username: "admin".into(),
        role: "admin".into(),
        permissions: vec!["all".into()],
        related_property_ids: vec![],
    };

    let mut draft = ReservationDraft::new(&floor.id, "T1", config.default_party_size, "21:30");
    draft.guest_name = Some("Walk-in demo".into());
    draft.consumption = Decimal::new(15000, 2);
    store
        .add_reservation(&owner, draft, admin.as_user_ref())
        .await
        .context("Failed to seed demo reservation")?;

    // 3. 协调器
    let guests = Arc::new(GuestStore::new(owner.organisation_id.clone(), store.clone()));
    let cached = guests.load_all().await.context("Failed to load guests")?;
    tracing::info!(cached, "Guest cache ready");

    let coordinator = Arc::new(
        ReservationCoordinator::new(
            owner,
            event,
            admin,
            store.clone(),
            Arc::new(HeadlessDialogs::new()),
            Arc::new(RecordingNotifier::new()),
        )
        .with_config(&config)
        .with_guest_store(guests),
    );
    coordinator.set_floors(std::slice::from_ref(&floor));

    // 4. 后台任务
    let mut tasks = BackgroundTasks::new();
    let listener = coordinator.clone();
    let token = tasks.shutdown_token();
    tasks.spawn("reservation_listener", TaskKind::Listener, async move {
        listener.run_subscription(token).await;
    });
    let sweeper = ExpirySweeper::new(
        coordinator.clone(),
        config.expiry_sweep_interval,
        tasks.shutdown_token(),
    );
    tasks.spawn("expiry_sweeper", TaskKind::Periodic, sweeper.run());
    tasks.log_summary();

    tracing::info!("Venue edge running, press Ctrl-C to stop");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    // 5. 关闭
    tasks.check_health();
    tasks.shutdown().await;
    tracing::info!("Venue edge stopped");
    Ok(())
}
