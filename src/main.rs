use clap::{Parser, Subcommand};
use layout_styles::resolve::StderrSink;
use layout_styles::{FsThemeSource, Placement, StyleResolver, config, output, render};
use std::path::{Path, PathBuf};

/// Where the image sits on the page.
#[derive(clap::Args, Clone)]
struct PlacementArgs {
    /// Page layout (empty string = use the fallback)
    layout: String,
    /// Section layout within the page layout (empty string = use the fallback)
    section_layout: String,
    /// Image style slot, e.g. "hero" or "teaser"
    image_style: String,
    /// Zone within the section layout, e.g. "zone2"
    #[arg(long)]
    zone: Option<String>,
    /// Report unmatched lookups to stderr
    #[arg(long)]
    admin: bool,
}

impl PlacementArgs {
    fn placement(&self) -> Placement {
        Placement {
            layout: self.layout.clone(),
            section_layout: self.section_layout.clone(),
            image_style: self.image_style.clone(),
            zone: self.zone.clone(),
        }
    }
}

#[derive(Parser)]
#[command(name = "layout-styles")]
#[command(about = "Resolve responsive image styles from a theme's layout file")]
#[command(long_about = "\
Resolve responsive image styles from a theme's layout file

The active theme is read from layout-styles.toml in the root directory.
Its layout file maps layout → section layout → image style slot to a
responsive image style; a list gives one style per zone:

  themes/northwind/northwind.responsive_image_layouts.yml
  fallback:
    one_column: full
  one_column:
    full:
      hero: hero_wide
  two_column:
    narrow_wide:
      teaser: [teaser_third, teaser_two_thirds]

Pass empty strings for the layout and section layout to use the fallback.
An unmatched lookup prints an empty line.

Run 'layout-styles gen-config' to generate a documented layout-styles.toml.")]
#[command(version)]
struct Cli {
    /// Application root directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the responsive image style for a placement
    Resolve(PlacementArgs),
    /// Resolve a placement and print the render description as JSON
    Render {
        /// Image reference passed through to the formatter
        image: String,
        #[command(flatten)]
        placement: PlacementArgs,
        /// Image attribute as key=value (repeatable)
        #[arg(long = "attr")]
        attrs: Vec<String>,
    },
    /// List the active theme's layouts and validate the fallback
    Check,
    /// Print a stock layout-styles.toml with all options documented
    GenConfig,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Resolve(args) => {
            let (resolver, admin) = build_resolver(&cli.root)?;
            let style = resolver.resolve(&args.placement(), admin || args.admin)?;
            println!("{style}");
        }
        Command::Render {
            image,
            placement,
            attrs,
        } => {
            let (resolver, admin) = build_resolver(&cli.root)?;
            let style = resolver.resolve(&placement.placement(), admin || placement.admin)?;
            let attributes = render::parse_attributes(attrs.iter().map(String::as_str));
            let description = render::build_image_render_description(image, style, attributes);
            println!("{}", serde_json::to_string_pretty(&description)?);
        }
        Command::Check => {
            let (resolver, _) = build_resolver(&cli.root)?;
            let (path, document) = resolver.load_document()?;
            output::print_check_output(&path, &document);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the host config and wire the resolver to the filesystem.
///
/// Also returns whether the config treats every caller as an administrator.
fn build_resolver(
    root: &Path,
) -> Result<(StyleResolver<FsThemeSource, StderrSink>, bool), config::ConfigError> {
    let host = config::load_config(root)?;
    let source = FsThemeSource::from_config(root, &host);
    Ok((
        StyleResolver::new(source, StderrSink),
        host.diagnostics.administrator,
    ))
}
