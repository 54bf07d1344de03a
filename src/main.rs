use std::env;
use std::fs;
use vecsynth::{
    logger, Credentials, GenerationRequest, Journal, Mode, Orchestrator,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger::init_with_config(logger::LoggerConfig::development().with_prefix("vecsynth"))?;

    match dotenv::dotenv() {
        Ok(_) => log::info!(".env file loaded successfully"),
        Err(_) => log::warn!("No .env file found, using system environment variables"),
    }

    log::info!("Checking provider credentials...");
    for (name, var) in [
        ("Gemini", "GEMINI_API_KEYS"),
        ("Stability AI", "STABILITY_API_KEY"),
        ("OpenAI", "OPENAI_API_KEY"),
        ("BytePlus", "ARK_API_KEY"),
    ] {
        match env::var(var) {
            Ok(value) if !value.is_empty() => {
                log::info!("{}: configured ({} chars)", name, value.len())
            }
            _ => log::warn!("{}: not configured ({})", name, var),
        }
    }

    log::info!("Registered models:");
    for model in vecsynth::model_registry().values() {
        log::info!(
            "  {} - {} ({})",
            model.id,
            model.label,
            model.provider.label()
        );
    }

    let mut credentials = Credentials::from_env();
    let journal = Journal::new();
    let orchestrator = Orchestrator::new(journal.clone());

    let prompt = env::args().skip(1).collect::<Vec<_>>().join(" ");
    let prompt = if prompt.is_empty() {
        "a minimalist mountain landscape at dusk".to_string()
    } else {
        prompt
    };

    log::info!("Generating: {}", prompt);
    let request = GenerationRequest::new(Mode::Vectorize, prompt);

    match orchestrator.generate(&request, &mut credentials).await {
        Ok(outcome) => {
            log::info!("Preset used: {}", outcome.preset_name);
            log::info!("Route taken: {:?}", outcome.route);

            let extension = match outcome.image.mime_type.as_str() {
                "image/webp" => "webp",
                "image/jpeg" => "jpg",
                _ => "png",
            };
            let filename = format!("vector-{}.{}", chrono::Utc::now().timestamp(), extension);
            match outcome.image.decode() {
                Ok(bytes) => {
                    fs::write(&filename, bytes)?;
                    log::info!("Image saved to: {}", filename);
                }
                Err(e) => log::error!("Failed to decode image: {}", e),
            }
        }
        Err(e) => {
            log::error!("Generation failed: {}", e);
        }
    }

    // The cursor may have advanced during rotation; a real caller would
    // persist `credentials` here.
    log::info!(
        "Active multimodal node after run: {:02}",
        credentials.gemini.cursor() + 1
    );

    log::info!("Session journal:");
    for entry in journal.entries() {
        log::info!(
            "  [{}] {} {}",
            entry.severity.as_str(),
            entry.timestamp.format("%H:%M:%S"),
            entry.message
        );
    }

    Ok(())
}
