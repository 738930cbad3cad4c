use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the chat page over HTTP
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8501")]
        port: u16,

        /// Bind to 0.0.0.0 instead of 127.0.0.1, exposing the server on all network interfaces
        #[arg(long)]
        public: bool,
    },

    /// Chat in the terminal, one message per line (`/quit` or EOF to leave)
    Chat,

    /// Send a single message in a fresh session and print the reply
    Ask { message: String },

    /// Show the loaded system prompt and the model configuration
    Prompt,
}
