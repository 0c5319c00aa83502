use trendvec_common::AppConfig;
use trendvec_vector::{build, sample_records, search, IndexStore, Record};

#[tokio::test]
async fn build_save_load_search() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::default().with_data_dir(dir.path());
    let store = IndexStore::new(&config);

    let index = build(sample_records(), config.embedding_dim).unwrap();
    store.save(&index, "hash-fnv1a32").await.unwrap();

    let loaded = store.load().await.unwrap();
    let results = search("white sneakers", &loaded, 3).unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].record.id, "sample-1");
    assert_eq!(results[0].record.price, Some(89.99));
    assert!(results[0].score > results[1].score);
}

#[tokio::test]
async fn custom_catalog_with_extra_fields() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::default().with_data_dir(dir.path());
    let store = IndexStore::new(&config);

    let mut records = sample_records();
    let mut scarf = Record::new(
        "p-100",
        "Wool Scarf",
        "Warm knitted wool scarf for winter",
        "Accessories",
        vec!["wool".into(), "winter".into()],
    );
    scarf
        .extra
        .insert("color".to_string(), serde_json::json!("grey"));
    records.push(scarf);

    store.save(&build(records, 32).unwrap(), "hash-fnv1a32").await.unwrap();
    let loaded = store.load().await.unwrap();

    assert_eq!(loaded.dim(), 32);
    assert_eq!(loaded.len(), 4);
    assert_eq!(loaded.records()[3].extra["color"], serde_json::json!("grey"));

    let results = search("wool scarf", &loaded, 10).unwrap();
    assert_eq!(results.len(), 4);
}
