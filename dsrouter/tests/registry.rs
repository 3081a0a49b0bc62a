use dsrouter::{
    KeyBuilderRegistry, Router, RouterError, ShardKeyBuilder,
    testing::{CountingFactory, FixedKeys},
};
use std::sync::Arc;

mod common;
use common::Regions;

#[test]
fn test_resolve_returns_cached_instance() {
    let counter = CountingFactory::new();
    let router = Router::builder()
        .register(counter.factory(|| FixedKeys::new(["a", "b"])))
        .build();

    assert!(!router.registry().is_cached::<FixedKeys>());
    let first = router.registry().resolve::<FixedKeys>().unwrap();
    let second = router.registry().resolve::<FixedKeys>().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert!(router.registry().is_cached::<FixedKeys>());
    assert_eq!(counter.count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_resolve_shares_one_instance() {
    let counter = CountingFactory::new();
    let router = Arc::new(
        Router::builder()
            .register(counter.factory(|| ShardKeyBuilder::new("user_db_", 4)))
            .build(),
    );

    let mut handles = Vec::new();
    for _ in 0..16 {
        let router = Arc::clone(&router);
        handles.push(tokio::spawn(async move {
            router.registry().resolve::<ShardKeyBuilder>()
        }));
    }

    let mut instances = Vec::new();
    for handle in handles {
        instances.push(handle.await.unwrap().unwrap());
    }

    let first = &instances[0];
    assert!(instances.iter().all(|other| Arc::ptr_eq(first, other)));

    // Later resolves never construct again.
    let constructed = counter.count();
    router.registry().resolve::<ShardKeyBuilder>().unwrap();
    assert_eq!(counter.count(), constructed);
}

#[test]
fn test_failed_construction_is_retried() {
    let counter = CountingFactory::new();
    let registry = KeyBuilderRegistry::builder()
        .register(counter.failing::<Regions>("config missing"))
        .build();

    for attempt in 1..=2 {
        match registry.resolve::<Regions>() {
            Err(RouterError::BuilderInstantiation { builder, source }) => {
                assert!(builder.ends_with("Regions"));
                assert_eq!(source.to_string(), "config missing");
            }
            other => panic!("attempt {attempt}: unexpected result {other:?}"),
        }
    }
    assert_eq!(counter.count(), 2);
    assert!(!registry.is_cached::<Regions>());
}

#[test]
fn test_registries_do_not_share_instances() {
    let first = common::router(0);
    let second = common::router(0);

    let a = first.registry().resolve::<Regions>().unwrap();
    let b = second.registry().resolve::<Regions>().unwrap();

    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(first.registry().len(), 2);
}
