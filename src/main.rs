use log::{error, info};
use recipe_extract::{parse_recipe_from_html, parse_recipe_from_url, ParseOptions};
use std::env;
use std::process::ExitCode;

const USAGE: &str = "Usage: recipe-extract <url>\n       recipe-extract --html <file> <source-url>";

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let options = ParseOptions::load()?;

    let recipe = match args.as_slice() {
        [flag, file, source_url] if flag == "--html" => {
            let html = tokio::fs::read_to_string(file).await?;
            parse_recipe_from_html(&html, source_url)
        }
        [url] if !url.starts_with("--") => {
            info!("Fetching {} (timeout {} ms)", url, options.timeout_ms);
            parse_recipe_from_url(url, &options).await?
        }
        _ => {
            eprintln!("{USAGE}");
            return Ok(ExitCode::from(2));
        }
    };

    match recipe {
        Some(recipe) => {
            println!("{}", serde_json::to_string_pretty(&recipe)?);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            error!("Unable to extract a recipe from this page.");
            Ok(ExitCode::FAILURE)
        }
    }
}
