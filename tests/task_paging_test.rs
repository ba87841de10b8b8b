//! Integration tests for keyset paging over a real database
//!
//! Runs the task repositories against in-memory SQLite, so every query the
//! SQLite dialect generates is executed for real.

use pagehaus::prelude::*;
use std::collections::HashSet;

const DEFINITIONS_HREF: &str = "http://localhost:9393/tasks/definitions";

async fn setup() -> PageHaus {
    let pagehaus = PageHaus::new(DatabaseConfig::sqlite_in_memory())
        .await
        .expect("in-memory SQLite should connect");
    pagehaus.migrate(true).await.expect("migration should succeed");
    pagehaus
}

async fn seed_definitions(pagehaus: &PageHaus, count: usize) {
    let repository = pagehaus.task_definitions();
    for i in 0..count {
        repository
            .save(
                TaskDefinition::new(format!("task-{:02}", i), "timestamp")
                    .with_description(format!("definition {}", i)),
            )
            .await
            .expect("save should succeed");
    }
}

#[tokio::test]
async fn test_health_check_and_dialect() {
    let pagehaus = setup().await;
    pagehaus.health_check().await.unwrap();
    assert_eq!(pagehaus.database_type(), DatabaseType::Sqlite);
}

#[tokio::test]
async fn test_pages_cover_every_definition_once() {
    let pagehaus = setup().await;
    seed_definitions(&pagehaus, 25).await;
    let repository = pagehaus.task_definitions();

    let mut seen = Vec::new();
    for page_number in 0..3 {
        let request = PageRequest::new(page_number, 10).unwrap();
        let page = repository.find_all(&request, None).await.unwrap();
        assert_eq!(page.total_elements(), 25);
        assert_eq!(page.metadata().total_pages, 3);
        seen.extend(page.into_content().into_iter().map(|d| d.name));
    }

    assert_eq!(seen.len(), 25);
    let unique: HashSet<_> = seen.iter().collect();
    assert_eq!(unique.len(), 25);

    let mut sorted = seen.clone();
    sorted.sort();
    assert_eq!(seen, sorted);
    assert_eq!(seen[10], "task-10");
    assert_eq!(seen[24], "task-24");
}

#[tokio::test]
async fn test_last_page_is_partial_and_past_the_end_is_empty() {
    let pagehaus = setup().await;
    seed_definitions(&pagehaus, 25).await;
    let repository = pagehaus.task_definitions();

    let last = repository
        .find_all(&PageRequest::new(2, 10).unwrap(), None)
        .await
        .unwrap();
    assert_eq!(last.content().len(), 5);
    assert!(!last.has_next());

    let beyond = repository
        .find_all(&PageRequest::new(5, 10).unwrap(), None)
        .await
        .unwrap();
    assert!(beyond.content().is_empty());
    assert_eq!(beyond.total_elements(), 25);
}

#[tokio::test]
async fn test_descending_sort_and_name_filter() {
    let pagehaus = setup().await;
    seed_definitions(&pagehaus, 25).await;
    let repository = pagehaus.task_definitions();

    let request = pagehaus
        .page_request(Some("1"), Some("5"), &["taskName,DESC"])
        .unwrap();
    let page = repository.find_all(&request, None).await.unwrap();
    let names: Vec<_> = page.content().iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["task-19", "task-18", "task-17", "task-16", "task-15"]);

    let filtered = repository
        .find_all(&PageRequest::new(0, 10).unwrap(), Some("task-1"))
        .await
        .unwrap();
    assert_eq!(filtered.total_elements(), 10);
    assert!(filtered.content().iter().all(|d| d.name.starts_with("task-1")));
}

async fn names_on_page(pagehaus: &PageHaus, page: &str, size: &str, sort: &str) -> Vec<String> {
    let request = pagehaus.page_request(Some(page), Some(size), &[sort]).unwrap();
    let page = pagehaus.task_definitions().find_all(&request, None).await.unwrap();
    assert_eq!(page.total_elements(), 4);
    page.into_content().into_iter().map(|d| d.name).collect()
}

#[tokio::test]
async fn test_pages_cross_null_descriptions() {
    let pagehaus = setup().await;
    let repository = pagehaus.task_definitions();
    repository.save(TaskDefinition::new("alpha", "timestamp")).await.unwrap();
    repository.save(TaskDefinition::new("beta", "timestamp")).await.unwrap();
    repository
        .save(TaskDefinition::new("gamma", "timestamp").with_description("x"))
        .await
        .unwrap();
    repository
        .save(TaskDefinition::new("delta", "timestamp").with_description("y"))
        .await
        .unwrap();

    assert_eq!(names_on_page(&pagehaus, "0", "2", "description,ASC").await, vec!["alpha", "beta"]);
    assert_eq!(names_on_page(&pagehaus, "1", "2", "description,ASC").await, vec!["gamma", "delta"]);

    assert_eq!(names_on_page(&pagehaus, "0", "2", "description,DESC").await, vec!["delta", "gamma"]);
    assert_eq!(names_on_page(&pagehaus, "1", "2", "description,DESC").await, vec!["alpha", "beta"]);

    // Resume from a row whose description is NULL
    assert_eq!(names_on_page(&pagehaus, "1", "1", "description,ASC").await, vec!["beta"]);
    assert_eq!(names_on_page(&pagehaus, "2", "1", "description,ASC").await, vec!["gamma"]);
}

#[tokio::test]
async fn test_pages_cross_running_executions_by_end_time() {
    let pagehaus = setup().await;
    let executions = pagehaus.task_executions();
    for _ in 0..3 {
        executions.create("timestamp", &[], None).await.unwrap();
    }
    executions.complete(1, 0, None, None).await.unwrap();

    let mut ids = Vec::new();
    for page in ["0", "1", "2"] {
        let request = pagehaus.page_request(Some(page), Some("1"), &["endTime,ASC"]).unwrap();
        let page = executions.find_all(&request, None).await.unwrap();
        assert_eq!(page.total_elements(), 3);
        ids.extend(page.into_content().into_iter().map(|e| e.execution_id));
    }

    assert_eq!(ids, vec![3, 2, 1]);
}

#[tokio::test]
async fn test_name_filter_matches_underscore_literally() {
    let pagehaus = setup().await;
    let repository = pagehaus.task_definitions();
    repository.save(TaskDefinition::new("task_0", "timestamp")).await.unwrap();
    repository.save(TaskDefinition::new("taskX0", "timestamp")).await.unwrap();

    let page = repository
        .find_all(&PageRequest::new(0, 10).unwrap(), Some("task_0"))
        .await
        .unwrap();

    assert_eq!(page.total_elements(), 1);
    assert_eq!(page.content()[0].name, "task_0");
}

#[tokio::test]
async fn test_unknown_sort_property_rejected() {
    let pagehaus = setup().await;
    let request = pagehaus
        .page_request(None, None, &["nonexistent,ASC"])
        .unwrap();

    let result = pagehaus.task_definitions().find_all(&request, None).await;
    assert!(matches!(result, Err(StoreError::InvalidSortProperty(_))));
}

#[tokio::test]
async fn test_duplicate_definition_rejected() {
    let pagehaus = setup().await;
    let repository = pagehaus.task_definitions();
    repository
        .save(TaskDefinition::new("etl", "ingest | transform"))
        .await
        .unwrap();

    let result = repository.save(TaskDefinition::new("etl", "other")).await;
    assert!(matches!(result, Err(StoreError::AlreadyExists(_))));
    assert_eq!(repository.count().await.unwrap(), 1);

    repository.delete_by_name("etl").await.unwrap();
    assert!(repository.find_by_name("etl").await.unwrap().is_none());
}

#[tokio::test]
async fn test_executions_info_counts() {
    let pagehaus = setup().await;
    let executions = pagehaus.task_executions();
    for _ in 0..4 {
        executions.create("timestamp", &[], None).await.unwrap();
    }

    assert_eq!(pagehaus.executions_info(None, None).await.unwrap().total_executions, 4);
    assert_eq!(
        pagehaus.executions_info(Some(true), None).await.unwrap().total_executions,
        0
    );
    assert_eq!(
        pagehaus.executions_info(Some(false), Some("timestamp")).await.unwrap().total_executions,
        4
    );

    executions.complete(1, 0, Some("done"), None).await.unwrap();
    assert_eq!(
        pagehaus.executions_info(Some(true), None).await.unwrap().total_executions,
        1
    );
}

#[tokio::test]
async fn test_execution_arguments_are_sanitized() {
    let pagehaus = setup().await;
    let created = pagehaus
        .task_executions()
        .create(
            "timestamp",
            &["--spring.datasource.password=s3cret".to_string(), "--format=yyyy".to_string()],
            None,
        )
        .await
        .unwrap();

    assert_eq!(created.execution_id, 1);
    assert_eq!(created.arguments.len(), 2);
    assert!(!created.arguments[0].contains("s3cret"));
    assert_eq!(created.arguments[1], "--format=yyyy");
}

#[tokio::test]
async fn test_executions_newest_first() {
    let pagehaus = setup().await;
    let executions = pagehaus.task_executions();
    for _ in 0..7 {
        executions.create("timestamp", &[], None).await.unwrap();
    }

    let request = PageRequest::new(1, 3).unwrap();
    let model = pagehaus
        .list_task_executions(&request, None, "http://localhost:9393/tasks/executions")
        .await
        .unwrap();
    let ids: Vec<_> = model
        .content("taskExecutionResourceList")
        .iter()
        .map(|e| e.execution_id)
        .collect();
    assert_eq!(ids, vec![4, 3, 2]);
}

#[tokio::test]
async fn test_definition_model_shape() {
    let pagehaus = setup().await;
    seed_definitions(&pagehaus, 3).await;
    pagehaus
        .task_executions()
        .create("task-00", &[], None)
        .await
        .unwrap();

    let request = PageRequest::new(0, 2).unwrap();
    let model = pagehaus
        .list_task_definitions(&request, None, DEFINITIONS_HREF)
        .await
        .unwrap();
    let json = serde_json::to_value(&model).unwrap();

    let resources = json["_embedded"]["taskDefinitionResourceList"].as_array().unwrap();
    assert_eq!(resources.len(), 2);
    assert_eq!(resources[0]["name"], "task-00");
    assert_eq!(resources[0]["status"], "RUNNING");
    assert_eq!(resources[1]["status"], "UNKNOWN");
    assert_eq!(
        resources[0]["_links"]["self"]["href"],
        "http://localhost:9393/tasks/definitions/task-00"
    );

    assert_eq!(json["page"]["totalElements"], 3);
    assert_eq!(json["page"]["totalPages"], 2);
    assert_eq!(
        json["_links"]["next"]["href"],
        "http://localhost:9393/tasks/definitions?page=1&size=2"
    );
    assert!(json["_links"].get("prev").is_none());
}
