//! dtext - dynamic text pictures
//!
//! Usage: dtext render <TEXT> [OPTIONS]

use std::env;
use std::error::Error;
use std::fs;
use std::process::ExitCode;

use dtext_escape::GameSnapshot;
use dtext_picture::{
    AssetLoader, DirectoryAssets, NoAssets, PictureLayer, PictureParams, PictureRenderer,
    TextPictureConfig, TextPictureRenderer, TextPictureSubsystem,
};
use dtext_render::{
    FontCache, GlyphSource, IconSheet, ImageBackend, RenderBackend, RenderColor, SimpleGlyphs,
    SkinTheme,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Slot used for the rendered picture
const PICTURE_ID: usize = 1;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        return ExitCode::FAILURE;
    }

    let result = match args[1].as_str() {
        "--help" | "-h" => {
            print_usage(&args[0]);
            return ExitCode::SUCCESS;
        }
        "--version" | "-V" => {
            println!("dtext {}", VERSION);
            return ExitCode::SUCCESS;
        }
        "render" => Options::parse(&args[2..]).and_then(|options| run_render(&options)),
        "resolve" => Options::parse(&args[2..]).and_then(|options| run_resolve(&options)),
        other => Err(format!("Unknown command '{}'", other).into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_usage(program: &str) {
    println!(
        r#"dtext {} - dynamic text pictures

USAGE:
    {} render <TEXT> [OPTIONS]
    {} resolve <TEXT> [OPTIONS]

OPTIONS:
    -h, --help              Print this help message
    -V, --version           Print version information
    --out <PATH>            Output image (default: picture.png)
    --font <PATH>           TrueType/OpenType font; block glyphs when omitted
    --font-size <N>         Font size for the text (0 keeps the default)
    --state <PATH>          Game state snapshot (JSON)
    --config <PATH>         Text picture configuration (JSON)
    --settings <PATH>       Saved text settings (JSON)
    --assets <DIR>          Asset root with pictures/ and system/

EXAMPLES:
    {} resolve '\V[1,3] \C[2]gold'
    {} render 'HP \V[1]' --state state.json --out hp.png

"#,
        VERSION, program, program, program, program
    );
}

/// Command line options shared by every command
#[derive(Debug, Default, PartialEq)]
struct Options {
    text: String,
    out: Option<String>,
    font: Option<String>,
    font_size: u32,
    state: Option<String>,
    config: Option<String>,
    settings: Option<String>,
    assets: Option<String>,
}

impl Options {
    fn parse(args: &[String]) -> Result<Self, Box<dyn Error>> {
        let mut options = Options::default();
        let mut text = None;
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            let mut value = || {
                iter.next()
                    .cloned()
                    .ok_or_else(|| format!("Missing value for {}", arg))
            };
            match arg.as_str() {
                "--out" => options.out = Some(value()?),
                "--font" => options.font = Some(value()?),
                "--font-size" => {
                    let raw = value()?;
                    options.font_size = raw
                        .parse()
                        .map_err(|_| format!("Invalid font size '{}'", raw))?;
                }
                "--state" => options.state = Some(value()?),
                "--config" => options.config = Some(value()?),
                "--settings" => options.settings = Some(value()?),
                "--assets" => options.assets = Some(value()?),
                flag if flag.starts_with("--") => {
                    return Err(format!("Unknown option '{}'", flag).into())
                }
                _ if text.is_none() => text = Some(arg.clone()),
                extra => return Err(format!("Unexpected argument '{}'", extra).into()),
            }
        }

        options.text = text.ok_or("Missing <TEXT>")?;
        Ok(options)
    }

    fn load_state(&self) -> Result<GameSnapshot, Box<dyn Error>> {
        match &self.state {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .map_err(|e| format!("Failed to read {}: {}", path, e))?;
                Ok(serde_json::from_str(&json)?)
            }
            None => Ok(GameSnapshot::new()),
        }
    }

    fn load_config(&self) -> Result<TextPictureConfig, Box<dyn Error>> {
        match &self.config {
            Some(path) => Ok(TextPictureConfig::from_path(path)?),
            None => Ok(TextPictureConfig::default()),
        }
    }
}

/// Print the resolved display string
fn run_resolve(options: &Options) -> Result<(), Box<dyn Error>> {
    let state = options.load_state()?;
    let subsystem = TextPictureSubsystem::new(options.load_config()?);
    println!("{}", subsystem.resolver(&state).resolve(&options.text));
    Ok(())
}

/// Render the text through a picture slot and write it to an image
fn run_render(options: &Options) -> Result<(), Box<dyn Error>> {
    let state = options.load_state()?;
    let config = options.load_config()?;
    let skin_name = config
        .frame_window_skin
        .clone()
        .unwrap_or_else(|| "Window".to_string());

    let mut subsystem = TextPictureSubsystem::new(config);
    if let Some(path) = &options.settings {
        let json =
            fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
        subsystem.load_settings(&json)?;
    }
    subsystem.prepare_text(options.text.as_str(), options.font_size);
    subsystem.show_picture(PICTURE_ID, PictureParams::default(), &state);

    let mut assets: Box<dyn AssetLoader> = match &options.assets {
        Some(root) => Box::new(DirectoryAssets::new(root)),
        None => Box::new(NoAssets),
    };
    let mut renderer: Box<dyn PictureRenderer> = match &options.font {
        Some(path) => build_renderer(FontCache::from_path(path)?, assets.as_mut(), &skin_name),
        None => build_renderer(SimpleGlyphs::new(), assets.as_mut(), &skin_name),
    };

    let mut layer = PictureLayer::new(&subsystem);
    layer.update(&subsystem, renderer.as_mut(), assets.as_mut(), &state, 0);

    let sprite = layer
        .sprite(PICTURE_ID)
        .filter(|sprite| sprite.is_visible())
        .ok_or("Nothing to render")?;

    let (x, y, width, height) = match sprite.chrome().window() {
        Some(window) => (window.x, window.y, window.width(), window.height()),
        None => {
            let bounds = sprite.bounds();
            (bounds.x, bounds.y, bounds.width.ceil() as u32, bounds.height.ceil() as u32)
        }
    };

    let mut list = layer.display_list();
    list.translate(-x, -y);

    let mut backend = ImageBackend::new(width, height);
    backend.clear(RenderColor::transparent());
    backend.render(&list);
    backend.present();

    let out = options.out.as_deref().unwrap_or("picture.png");
    backend.save(out)?;
    println!("{}x{} -> {}", backend.width(), backend.height(), out);
    Ok(())
}

/// Text renderer with the skin's palette and the icon sheet when available
fn build_renderer<G: GlyphSource + 'static>(
    glyphs: G,
    assets: &mut dyn AssetLoader,
    skin_name: &str,
) -> Box<dyn PictureRenderer> {
    let mut renderer = TextPictureRenderer::new(glyphs);

    match assets.load_system(skin_name).map(|skin| SkinTheme::from_skin(&skin)) {
        Ok(Some(theme)) => renderer = renderer.with_theme(theme),
        Ok(None) => log::warn!("Window skin '{}' is too small for a palette", skin_name),
        Err(e) => log::debug!("Default palette: {}", e),
    }

    match assets.load_system("IconSet") {
        Ok(sheet) => renderer = renderer.with_icons(IconSheet::new(sheet)),
        Err(e) => log::debug!("No icons: {}", e),
    }

    Box::new(renderer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_options() {
        let options = Options::parse(&args(&[
            "HP \\V[1]",
            "--font-size",
            "20",
            "--out",
            "hp.png",
            "--settings",
            "settings.json",
        ]))
        .unwrap();
        assert_eq!(options.text, "HP \\V[1]");
        assert_eq!(options.font_size, 20);
        assert_eq!(options.out.as_deref(), Some("hp.png"));
        assert_eq!(options.settings.as_deref(), Some("settings.json"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(Options::parse(&args(&[])).is_err());
        assert!(Options::parse(&args(&["a", "--out"])).is_err());
        assert!(Options::parse(&args(&["a", "--font-size", "big"])).is_err());
        assert!(Options::parse(&args(&["a", "--bogus"])).is_err());
        assert!(Options::parse(&args(&["a", "b"])).is_err());
    }

    #[test]
    fn test_defaults_without_files() {
        let options = Options::parse(&args(&["text"])).unwrap();
        assert!(options.load_state().unwrap().variables.is_empty());
        assert_eq!(options.load_config().unwrap(), TextPictureConfig::default());
    }
}
