use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "coursehub",
    about = "Provision and clean up per-student GitHub repositories for a course",
    version
)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "coursehub.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

/// Identifies the course organization a command acts on.
#[derive(clap::Args, Debug, Clone)]
struct CourseArgs {
    /// GitHub organization of the course
    #[arg(long)]
    org: String,
    /// GitHub App installation id for the organization
    #[arg(long, default_value = "default")]
    installation_id: String,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
    /// Create (if missing) and grant access to one repository per student
    Provision {
        #[command(flatten)]
        course: CourseArgs,
        /// Assignment or project prefix; repositories are named <prefix>-<login>
        #[arg(long)]
        prefix: String,
        /// GitHub login of a student (repeatable)
        #[arg(long = "student", required = true)]
        students: Vec<String>,
        /// Create public repositories instead of the configured default
        #[arg(long)]
        public: bool,
        /// Permission to grant: read, triage, write, maintain, admin
        #[arg(long)]
        permission: Option<String>,
    },
    /// List repositories named <prefix>-*
    List {
        #[command(flatten)]
        course: CourseArgs,
        #[arg(long)]
        prefix: String,
    },
    /// Delete every repository created for an assignment
    DeleteAssignment {
        #[command(flatten)]
        course: CourseArgs,
        #[arg(long)]
        assignment: String,
        /// Actually delete; without this flag only the matches are listed
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { force } => {
            commands::init::run(&cli.config, force)?;
        }
        Commands::Provision {
            course,
            prefix,
            students,
            public,
            permission,
        } => {
            commands::provision::run(
                &cli.config,
                &course.org,
                &course.installation_id,
                &prefix,
                &students,
                public,
                permission.as_deref(),
            )
            .await?;
        }
        Commands::List { course, prefix } => {
            commands::list::run(&cli.config, &course.org, &course.installation_id, &prefix)
                .await?;
        }
        Commands::DeleteAssignment {
            course,
            assignment,
            yes,
        } => {
            commands::delete_assignment::run(
                &cli.config,
                &course.org,
                &course.installation_id,
                &assignment,
                yes,
            )
            .await?;
        }
    }

    Ok(())
}
