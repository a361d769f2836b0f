use adaptlm::hub::T5Translator;
use adaptlm::translation::DEFAULT_TRANSLATION_MODEL;
use adaptlm::{EasyTranslator, GenerationRequest, TranslationOptions};
use anyhow::Result;
use clap::Parser;
use log::info;

#[derive(Parser, Debug)]
struct Args {
    /// Model id on Huggingface Hub, or a local directory
    #[arg(short = 'm', long, default_value = DEFAULT_TRANSLATION_MODEL)]
    model: String,
    /// Task prefix for T5 models
    #[arg(short = 'p', long, default_value = "translate English to German")]
    prefix: String,
    /// Texts per batch
    #[arg(short = 'b', long, default_value_t = 32)]
    mini_batch_size: usize,
    /// Beams for beam search, 1 means greedy
    #[arg(long, default_value_t = 1)]
    num_beams: usize,
    #[arg(long, default_value_t = 0)]
    min_length: usize,
    #[arg(long, default_value_t = 128)]
    max_length: usize,
    /// Keep searching after num_beams hypotheses finish
    #[arg(long)]
    no_early_stopping: bool,
    #[arg(long)]
    length_penalty: Option<f64>,
    #[arg(long)]
    repetition_penalty: Option<f64>,
    /// Texts to translate
    #[arg(required = true)]
    text: Vec<String>,
}

impl Args {
    fn options(&self) -> TranslationOptions {
        let mut generation = GenerationRequest::default()
            .num_beams(self.num_beams)
            .min_length(self.min_length)
            .max_length(self.max_length)
            .early_stopping(!self.no_early_stopping);
        if let Some(penalty) = self.length_penalty {
            generation = generation.with_extra("length_penalty", penalty);
        }
        if let Some(penalty) = self.repetition_penalty {
            generation = generation.with_extra("repetition_penalty", penalty);
        }

        TranslationOptions::default()
            .prefix(self.prefix.clone())
            .mini_batch_size(self.mini_batch_size)
            .generation(generation)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let translator: EasyTranslator<T5Translator> = EasyTranslator::new();
    let translations = translator
        .translate(args.text.clone(), &args.model, args.options())
        .await?;

    for (source, translation) in args.text.iter().zip(translations.iter()) {
        println!("{} => {}", source, translation);
    }
    info!("Cached models: {:?}", translator.cached_models().await);
    Ok(())
}
