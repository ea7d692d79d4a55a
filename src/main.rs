use bigmodel_translator::translation::StreamOutcome;
use bigmodel_translator::{
    ApiError, AppConfig, DocumentJob, DocumentTranslator, PollPolicy, StreamObserver,
    TranslationClient, TranslationRequest, UploadPayload,
};
use std::env;
use std::io::Write;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const API_KEY_VAR: &str = "BIGMODEL_API_KEY";

/// Writes fragments to stdout as they arrive.
struct StdoutTypist {
    failed: Option<ApiError>,
}

impl StreamObserver for StdoutTypist {
    fn on_fragment(&mut self, fragment: &str) {
        let mut out = std::io::stdout().lock();
        let _ = out.write_all(fragment.as_bytes());
        let _ = out.flush();
    }

    fn on_complete(&mut self) {
        println!();
    }

    fn on_error(&mut self, error: ApiError) {
        self.failed = Some(error);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load_or_default(Some("config.toml"));

    let default_directive = format!("bigmodel_translator={}", config.logging.level);
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(default_directive.parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().collect();
    let api_key = env::var(API_KEY_VAR)
        .map_err(|_| anyhow::anyhow!("{} is not set", API_KEY_VAR))?;
    let client = TranslationClient::new(config.api.clone())?;

    match args.get(1).map(String::as_str) {
        Some("text") if args.len() > 2 => {
            let text = args[2..].join(" ");
            run_text(&client, &config, &api_key, text).await
        }
        Some("doc") if args.len() > 2 => run_document(&client, &config, &api_key, &args[2]).await,
        Some("query") if args.len() > 2 => run_query(&client, &api_key, &args[2]).await,
        _ => {
            eprintln!("usage:");
            eprintln!("  bigmodel-translator text <words...>   stream a translation");
            eprintln!("  bigmodel-translator doc <path>        translate a document");
            eprintln!("  bigmodel-translator query <async_id>  check a document task");
            std::process::exit(2);
        }
    }
}

async fn run_text(
    client: &TranslationClient,
    config: &AppConfig,
    api_key: &str,
    text: String,
) -> anyhow::Result<()> {
    let request = TranslationRequest::text(
        text,
        &config.defaults.source_lang,
        &config.defaults.target_lang,
        api_key,
    )
    .with_strategy(config.defaults.strategy);

    let mut typist = StdoutTypist { failed: None };
    if client.stream_translation(&request, &mut typist).await == StreamOutcome::Failed {
        if let Some(error) = typist.failed {
            anyhow::bail!("{}", error);
        }
    }
    Ok(())
}

async fn run_document(
    client: &TranslationClient,
    config: &AppConfig,
    api_key: &str,
    path: &str,
) -> anyhow::Result<()> {
    let payload = UploadPayload::from_path(Path::new(path)).await?;
    payload.validate(&config.upload)?;

    let job = DocumentJob {
        source_lang: config.defaults.source_lang.clone(),
        target_lang: config.defaults.target_lang.clone(),
        translate_images: config.defaults.translate_images,
    };

    let translator = DocumentTranslator::new(client, PollPolicy::from(&config.polling));
    let task = translator
        .translate(payload, &job, api_key, |task| {
            tracing::info!(
                file = %task.file_name,
                async_id = %task.remote_async_id,
                status = %task.status,
                "Task update"
            );
        })
        .await?;

    for artifact in &task.artifacts {
        println!("{:?}\t{}\t{}", artifact.kind, artifact.label, artifact.url);
    }
    Ok(())
}

async fn run_query(client: &TranslationClient, api_key: &str, async_id: &str) -> anyhow::Result<()> {
    let result = client.query_result(async_id, api_key).await?;
    println!("status: {}", result.status);
    if let Some(message) = result.error_message() {
        println!("error: {}", message);
    }
    for artifact in result.artifacts() {
        println!("{:?}\t{}\t{}", artifact.kind, artifact.label, artifact.url);
    }
    Ok(())
}
