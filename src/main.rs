use anyhow::Result;
use clap::error::ErrorKind as ClapErrorKind;
use clap::{Parser, Subcommand};
use gitlet::areas::repository::Repository;
use gitlet::artifacts::core::PagerWriter;
use gitlet::config::Config;
use gitlet::errors::RepositoryError;
use is_terminal::IsTerminal;
use minus::Pager;
use std::io::Write;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "gitlet",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A small content-addressed version-control system",
    long_about = "gitlet tracks snapshots of a working directory, supports branching, \
    three-way merges with conflict markers and remotes living on the local filesystem.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(name = "init", about = "Create a repository in the current directory")]
    Init,
    #[command(name = "add", about = "Stage a file for the next commit")]
    Add {
        #[arg(index = 1)]
        file: String,
    },
    #[command(name = "rm", about = "Unstage a file or schedule its removal")]
    Rm {
        #[arg(index = 1)]
        file: String,
    },
    #[command(name = "commit", about = "Snapshot the staged changes")]
    Commit {
        #[arg(index = 1, allow_hyphen_values = true)]
        message: String,
    },
    #[command(name = "log", about = "Show the first-parent history of the current head")]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(name = "find", about = "Print the ids of commits with the given message")]
    Find {
        #[arg(index = 1, allow_hyphen_values = true)]
        message: String,
    },
    #[command(name = "status", about = "Show branches, staged files and working directory state")]
    Status,
    #[command(name = "branch", about = "Create a branch at the current head")]
    Branch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch")]
    RmBranch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(
        name = "checkout",
        about = "Switch branches or restore a file",
        long_about = "checkout <branch> switches branches, checkout -- <file> restores a file \
        from the head commit and checkout <commit> -- <file> restores it from any commit."
    )]
    Checkout {
        #[arg(index = 1)]
        target: Option<String>,
        #[arg(index = 2, last = true)]
        file: Option<String>,
    },
    #[command(name = "reset", about = "Move the current branch to a commit")]
    Reset {
        #[arg(index = 1)]
        commit: String,
    },
    #[command(name = "merge", about = "Merge a branch into the current branch")]
    Merge {
        #[arg(index = 1)]
        branch: String,
    },
    #[command(name = "add-remote", about = "Register a remote repository directory")]
    AddRemote {
        #[arg(index = 1)]
        name: String,
        #[arg(index = 2)]
        directory: String,
    },
    #[command(name = "rm-remote", about = "Unregister a remote")]
    RmRemote {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "push", about = "Append the current head to a remote branch")]
    Push {
        #[arg(index = 1)]
        remote: String,
        #[arg(index = 2)]
        branch: String,
    },
    #[command(name = "fetch", about = "Copy a remote branch into <remote>/<branch>")]
    Fetch {
        #[arg(index = 1)]
        remote: String,
        #[arg(index = 2)]
        branch: String,
    },
    #[command(name = "pull", about = "Fetch a remote branch and merge it")]
    Pull {
        #[arg(index = 1)]
        remote: String,
        #[arg(index = 2)]
        branch: String,
    },
}

impl Commands {
    fn is_paged(&self) -> bool {
        matches!(self, Commands::Log | Commands::GlobalLog)
    }
}

fn parse_cli() -> Result<Cli> {
    Cli::try_parse().map_err(|error| {
        let handled = match error.kind() {
            ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => error.exit(),
            ClapErrorKind::MissingSubcommand
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => RepositoryError::NoCommand,
            ClapErrorKind::InvalidSubcommand => RepositoryError::UnknownCommand,
            _ => RepositoryError::IncorrectOperands,
        };

        handled.into()
    })
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(config.log_filter()).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: &Commands, config: Config) -> Result<()> {
    let pwd = std::env::current_dir()?;
    let pager = (command.is_paged() && config.use_pager()).then(Pager::new);
    let writer: Box<dyn Write> = match &pager {
        Some(pager) => Box::new(PagerWriter::new(pager.clone())),
        None => Box::new(std::io::stdout()),
    };

    let mut repository = Repository::new(&pwd.to_string_lossy(), writer, config)?;
    if !matches!(command, Commands::Init) {
        repository.ensure_initialized()?;
    }

    match command {
        Commands::Init => repository.init().await?,
        Commands::Add { file } => repository.add(file).await?,
        Commands::Rm { file } => repository.rm(file).await?,
        Commands::Commit { message } => repository.commit(message).await?,
        Commands::Log => repository.log()?,
        Commands::GlobalLog => repository.global_log()?,
        Commands::Find { message } => repository.find(message)?,
        Commands::Status => repository.status().await?,
        Commands::Branch { name } => repository.branch(name)?,
        Commands::RmBranch { name } => repository.rm_branch(name)?,
        Commands::Checkout { target, file } => match (target, file) {
            (Some(branch), None) => repository.checkout_branch(branch).await?,
            (commit, Some(file)) => repository.checkout_file(commit.as_deref(), file)?,
            (None, None) => return Err(RepositoryError::IncorrectOperands.into()),
        },
        Commands::Reset { commit } => repository.reset(commit).await?,
        Commands::Merge { branch } => repository.merge(branch).await?,
        Commands::AddRemote { name, directory } => repository.add_remote(name, directory)?,
        Commands::RmRemote { name } => repository.rm_remote(name)?,
        Commands::Push { remote, branch } => repository.push(remote, branch)?,
        Commands::Fetch { remote, branch } => repository.fetch(remote, branch)?,
        Commands::Pull { remote, branch } => repository.pull(remote, branch).await?,
    }

    repository.writer().flush()?;
    if let Some(pager) = pager {
        minus::page_all(pager)?;
    }

    Ok(())
}

/// Handled failures print their message on stdout and still exit successfully
fn report(error: anyhow::Error) -> Result<()> {
    match error.downcast_ref::<RepositoryError>() {
        Some(handled) => {
            tracing::debug!(kind = ?handled.kind(), "command failed");
            println!("{handled}");
            Ok(())
        }
        None => Err(error),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load_from_env();
    init_tracing(&config);

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let cli = match parse_cli() {
        Ok(cli) => cli,
        Err(error) => return report(error),
    };

    match run(&cli.command, config).await {
        Ok(()) => Ok(()),
        Err(error) => report(error),
    }
}
