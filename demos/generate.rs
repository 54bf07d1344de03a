use vecsynth::{catalog, Credentials, GenerationRequest, Journal, Mode, Orchestrator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    vecsynth::logger::init()?;
    match dotenv::dotenv() {
        Ok(_) => log::info!(".env file loaded"),
        Err(_) => log::warn!("No .env file found"),
    }

    let mut credentials = Credentials::from_env();
    let orchestrator = Orchestrator::new(Journal::new());

    // Pick the first typography preset from the built-in catalog.
    let preset = catalog()
        .iter()
        .find(|c| c.category == "Typography Art")
        .and_then(|c| c.presets.first())
        .cloned()
        .expect("catalog has typography presets");

    let request = GenerationRequest::new(Mode::Lettering, "Synthesize").with_preset(preset);

    let outcome = orchestrator.generate(&request, &mut credentials).await?;
    println!(
        "generated {} bytes via {:?} with preset '{}'",
        outcome.image.data.len(),
        outcome.route,
        outcome.preset_name
    );

    Ok(())
}
