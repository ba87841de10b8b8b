//! Pages through task definitions on in-memory SQLite and prints the
//! paging SQL every supported dialect generates for the same query.
//!
//! Run with `cargo run --example demo --features debug-logging`.

use pagehaus::prelude::*;
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let pagehaus = PageHaus::new(DatabaseConfig::sqlite_in_memory()).await?;
    pagehaus.migrate(true).await?;

    let definitions = pagehaus.task_definitions();
    for i in 0..12 {
        definitions
            .save(TaskDefinition::new(format!("timestamp-{:02}", i), "timestamp --format=yyyy"))
            .await?;
    }
    definitions
        .save(TaskDefinition::new("composed", "timestamp-00 && timestamp-01"))
        .await?;

    let executions = pagehaus.task_executions();
    let execution = executions
        .create("timestamp-00", &["--db.password=hunter2".to_string()], None)
        .await?;
    executions.complete(execution.execution_id, 0, Some("done"), None).await?;

    let request = pagehaus.page_request(Some("1"), Some("5"), &["taskName,ASC"])?;
    let model = pagehaus
        .list_task_definitions(&request, None, "http://localhost:9393/tasks/definitions")
        .await?;
    println!("{}", serde_json::to_string_pretty(&model)?);

    let spec = QuerySpec::builder("TASK_EXECUTION")
        .columns(&["TASK_EXECUTION_ID", "TASK_NAME", "START_TIME"])
        .filter(QueryFilter::eq("TASK_NAME", json!("timestamp-00")))
        .order_by("START_TIME", SortOrder::Desc)
        .order_by("TASK_EXECUTION_ID", SortOrder::Desc)
        .build()?;

    for database in DatabaseType::ALL {
        let provider = PagingQueryProvider::for_database(spec.clone(), database);
        println!("-- {}", database);
        println!("{}", provider.generate_first_page_query(10)?);
        println!("{}", provider.generate_remaining_pages_query(10)?);
        println!("{}", provider.generate_jump_to_item_query(25, 10)?);
    }

    Ok(())
}
