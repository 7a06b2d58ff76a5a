use log::{info, warn};
use mongodb::{
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client,
};
use std::sync::Arc;
use std::time::Duration;

pub const PLANS_DATABASE: &str = "Trips";
pub const PLANS_COLLECTION: &str = "TourPlans";

pub async fn create_mongo_client(uri: &str) -> mongodb::error::Result<Arc<Client>> {
    let mut client_options = ClientOptions::parse(uri).await?;

    client_options.app_name = Some("tourplan-api".to_string());
    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    // MongoDB 5.0+
    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    let client = Client::with_options(client_options)?;

    match ping(&client).await {
        Ok(()) => info!("Connected to MongoDB"),
        Err(e) => warn!(
            "Connected to MongoDB but ping failed: {}. Persistence may be impaired.",
            e
        ),
    }

    Ok(Arc::new(client))
}

pub async fn ping(client: &Client) -> mongodb::error::Result<()> {
    client
        .database(PLANS_DATABASE)
        .run_command(mongodb::bson::doc! {"ping": 1})
        .await?;
    Ok(())
}
