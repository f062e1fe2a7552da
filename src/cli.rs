use clap::Parser;

/// Repository downloaded when only a template is given
pub const DEFAULT_REPO: &str = "debdut/no-build";

/// Base URL of the hosting API
pub const DEFAULT_API_URL: &str = "https://api.github.com";

pub const USAGE: &str = "Usage: nobuild <template> or nobuild <repo> <template>";

#[derive(Parser, Debug)]
#[command(name = "nobuild")]
#[command(version)]
#[command(about = "Download a template folder from a GitHub repository", long_about = None)]
#[command(after_help = "Examples:\n  \
  nobuild react                  extract the react template from debdut/no-build\n  \
  nobuild owner/repo starter     extract the starter folder from owner/repo\n  \
  nobuild owner/repo .           extract the whole repository archive")]
pub struct Cli {
    /// Template name, or repository when a template follows
    #[arg(value_name = "REPO|TEMPLATE", allow_hyphen_values = true)]
    pub first: String,

    /// Template name (`.` extracts everything)
    #[arg(value_name = "TEMPLATE", allow_hyphen_values = true)]
    pub second: Option<String>,

    /// Hosting API base URL
    #[arg(long, env = "NOBUILD_API_URL", default_value = DEFAULT_API_URL, hide = true)]
    pub api_url: String,
}

impl Cli {
    /// The `owner/name` repository to download
    pub fn repo(&self) -> &str {
        match self.second {
            Some(_) => &self.first,
            None => DEFAULT_REPO,
        }
    }

    /// The template selector as given on the command line
    pub fn template(&self) -> &str {
        self.second.as_deref().unwrap_or(&self.first)
    }
}
