//! Hike command line client
//!
//! Every command works on the session stored at `HIKE_SESSION_PATH`, so
//! `hike login` once and the other commands act as that user.

use std::path::{Path, PathBuf};
use std::pin::pin;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use hike_core::common::{
    BaseNotifier, FriendRequestId, Notification, PostId, TracingNotifier, UserId,
};
use hike_core::domains::auth::AuthService;
use hike_core::domains::friends::FriendsPage;
use hike_core::domains::posts::{Composer, PostFeed, SubmitOutcome, UploadFile};
use hike_core::domains::profile::ProfileSettings;
use hike_core::domains::session::{Session, SessionStore};
use hike_core::{AppKernel, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "hike", about = "Hike social client", version)]
struct Cli {
    /// Send notifications to the log instead of printing them
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out and forget the session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Publish a post with optional images
    Post {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        content: String,
        /// Image to attach; repeat for several, order is kept
        #[arg(long = "image")]
        images: Vec<PathBuf>,
    },
    /// List posts
    Feed,
    /// Delete a post
    Delete { post_id: String },
    /// Show friends, incoming requests and recommendations
    Friends,
    /// Send a friend request
    Befriend { user_id: String },
    /// Accept a friend request
    Accept { request_id: String },
    /// Reject a friend request
    Reject { request_id: String },
    /// Remove a friend
    Unfriend { user_id: String },
    /// Update name and email
    Profile {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// Upload a new profile picture
    Avatar { path: PathBuf },
}

/// Prints notifications to the terminal.
struct ConsoleNotifier;

impl BaseNotifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        let marker = if notification.is_error() { "✗" } else { "✓" };
        match &notification.description {
            Some(description) => println!("{} {}: {}", marker, notification.title, description),
            None => println!("{} {}", marker, notification.title),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,hike_core=info,hike_api=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let notifier: Arc<dyn BaseNotifier> = if cli.quiet {
        Arc::new(TracingNotifier)
    } else {
        Arc::new(ConsoleNotifier)
    };
    let kernel = AppKernel::http(&config, notifier)?;

    let session = Session::new(SessionStore::new(&config.session_path));
    session
        .load()
        .with_context(|| format!("Failed to load session from {}", config.session_path.display()))?;

    tracing::debug!(base_url = %config.base_url, "Hike client ready");

    run(cli.command, &kernel, session).await
}

async fn run(command: Command, kernel: &AppKernel, session: Session) -> Result<()> {
    match command {
        Command::Register {
            name,
            email,
            password,
        } => {
            let user = AuthService::new(kernel, session)
                .register(&name, &email, &password)
                .await?;
            println!("Registered {} ({})", user.display_name(), user.id);
        }
        Command::Login { email, password } => {
            let user = AuthService::new(kernel, session).login(&email, &password).await?;
            println!("Signed in as {} ({})", user.display_name(), user.id);
        }
        Command::Logout => {
            AuthService::new(kernel, session).logout().await?;
            println!("Signed out");
        }
        Command::Whoami => match session.current() {
            Some(user) => {
                println!("{} ({})", user.display_name(), user.id);
                if let Some(email) = &user.email {
                    println!("  email: {}", email);
                }
                if let Some(picture) = &user.profile_pic {
                    println!("  picture: {}", picture);
                }
            }
            None => println!("Not signed in"),
        },
        Command::Post {
            title,
            content,
            images,
        } => post(kernel, session, title, content, &images).await?,
        Command::Feed => {
            let viewer = signed_in(&session)?;
            let feed = PostFeed::new(kernel);
            feed.refresh(&viewer).await?;
            for post in feed.posts() {
                let author = post
                    .author
                    .as_ref()
                    .map(|author| author.display_name().to_string())
                    .unwrap_or_else(|| "User".to_string());
                println!("{}  {}  by {}", post.id, post.title, author);
                if !post.content.is_empty() {
                    println!("    {}", post.content);
                }
                for image in &post.images {
                    println!("    [image] {}", image);
                }
                println!(
                    "    {} likes, {} comments",
                    post.like_count, post.comment_count
                );
                for comment in post.comments.iter().take(2) {
                    println!("    {}: {}", comment.display_author(), comment.content);
                }
            }
        }
        Command::Delete { post_id } => {
            signed_in(&session)?;
            PostFeed::new(kernel).delete(&PostId::new(post_id)).await?;
        }
        Command::Friends => {
            let page = FriendsPage::new(kernel, session);
            page.refresh().await?;

            println!("Friends:");
            for friend in page.friends() {
                println!("  {}  {}", friend.id, friend.display_name());
            }
            println!("Requests:");
            for request in page.requests() {
                println!("  {}  from {}", request.id, request.sender.display_name());
            }
            println!("Recommended:");
            for user in page.recommended() {
                println!("  {}  {}", user.id, user.display_name());
            }
        }
        Command::Befriend { user_id } => {
            FriendsPage::new(kernel, session)
                .send_request(&UserId::new(user_id))
                .await?;
        }
        Command::Accept { request_id } => {
            FriendsPage::new(kernel, session)
                .accept(&FriendRequestId::new(request_id))
                .await?;
        }
        Command::Reject { request_id } => {
            FriendsPage::new(kernel, session)
                .reject(&FriendRequestId::new(request_id))
                .await?;
        }
        Command::Unfriend { user_id } => {
            FriendsPage::new(kernel, session)
                .remove_friend(&UserId::new(user_id))
                .await?;
        }
        Command::Profile { name, email } => {
            ProfileSettings::new(kernel, session)
                .update_details(&name, &email)
                .await?;
        }
        Command::Avatar { path } => {
            let file = read_file(&path).await?;
            let user = ProfileSettings::new(kernel, session).upload_picture(&file).await?;
            if let Some(picture) = user.profile_pic {
                println!("Profile picture: {}", picture);
            }
        }
    }

    Ok(())
}

/// Compose and submit a post. Ctrl-C cancels the submission between steps.
async fn post(
    kernel: &AppKernel,
    session: Session,
    title: String,
    content: String,
    images: &[PathBuf],
) -> Result<()> {
    let mut files = Vec::with_capacity(images.len());
    for path in images {
        files.push(read_file(path).await?);
    }

    let composer = Composer::new(kernel, session);
    composer.set_title(title);
    composer.set_content(content);
    composer.select_files(files);

    let mut submit = pin!(composer.submit());
    let outcome = tokio::select! {
        outcome = &mut submit => outcome,
        _ = tokio::signal::ctrl_c() => {
            composer.cancel_submit();
            submit.await
        }
    };

    match outcome {
        SubmitOutcome::Published(post) => {
            println!("{}  {}", post.id, post.title);
            for image in &post.images {
                println!("    [image] {}", image);
            }
            Ok(())
        }
        SubmitOutcome::AlreadySubmitting => bail!("A submission is already in progress"),
        SubmitOutcome::Invalid(e) => bail!(e),
        SubmitOutcome::Failed(e) => Err(e.into()),
    }
}

async fn read_file(path: &Path) -> Result<UploadFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .context("File name is not valid UTF-8")?;
    Ok(UploadFile::guessed(name, bytes))
}

fn signed_in(session: &Session) -> Result<UserId> {
    session.user_id().context("Not signed in. Run `hike login` first")
}
