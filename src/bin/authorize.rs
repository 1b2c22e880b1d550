use mogulsync::calendar::token::TokenStore;
use mogulsync::startup;

#[tokio::main]
async fn main() -> miette::Result<()> {
    startup::init_logging()?;

    // Load configuration
    let config = startup::load_config()?;

    // Run the interactive consent flow and persist the resulting token
    let tokens = TokenStore::new(&config);
    let token = tokens.authorize().await?;
    tokens.persist(&token)?;

    println!("Token successfully saved to {}", config.token_path);

    Ok(())
}
