use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "kubeshelf", about = "Keep many kubeconfig files and remember which one holds each context")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log state changes to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to <config dir>/kubeshelf/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print the saved kubeconfig, context and namespace
    #[command(name = "show-saved-selection", alias = "show")]
    ShowSavedSelection,

    /// Rescan the credential directory and rebuild the context registry
    #[command(name = "rebuild-registry", alias = "rebuild")]
    RebuildRegistry,

    /// Remove a context, its namespace cache and saved selection
    #[command(name = "remove-context", alias = "rm")]
    RemoveContext {
        name: Option<String>,
        /// Show what would be removed without changing anything
        #[arg(long)]
        dry_run: bool,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Remember a namespace for a context
    #[command(name = "add-namespace")]
    AddNamespace {
        name: String,
        /// Context to use instead of the saved one
        #[arg(long)]
        context: Option<String>,
    },

    /// Forget one or more remembered namespaces
    #[command(name = "remove-namespace")]
    RemoveNamespace {
        names: Vec<String>,
        #[arg(long)]
        context: Option<String>,
    },

    /// List namespaces, live if possible, otherwise remembered ones
    #[command(name = "list-namespaces", alias = "ns")]
    ListNamespaces {
        #[arg(long)]
        context: Option<String>,
        /// Only show remembered namespaces
        #[arg(long)]
        cached: bool,
    },

    /// List every known context and the file defining it
    #[command(name = "list-contexts", alias = "ls")]
    ListContexts {
        #[arg(long)]
        json: bool,
    },

    /// Copy a kubeconfig into the credential directory and register its contexts
    Import {
        file: PathBuf,
        /// File name inside the credential directory
        #[arg(long)]
        name: Option<String>,
        /// Keep context names without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Rename a context in its kubeconfig and everywhere kubeshelf refers to it
    #[command(name = "rename-context")]
    RenameContext { old: String, new: String },

    /// Select a context and namespace and save the selection
    Switch { context: Option<String>, namespace: Option<String> },

    /// Print shell exports for the saved selection
    Env,

    /// Write the default config file
    #[command(name = "init-config")]
    InitConfig,
}
