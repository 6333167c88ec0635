//! Opening a theme's style sheet in an external editor
//!
//! A missing file association is reported to the user through a dialog;
//! any other failure is only logged.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{fs::OpenOptions, process::Command};
use tracing::{error, info};

use crate::error::{Result, ThemeError};

/// Opens files with whatever application the system associates with them
#[async_trait]
pub trait FileOpener: Send + Sync {
    async fn open(&self, path: &Path) -> Result<()>;
}

/// Opener backed by the platform's `open` command
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl SystemOpener {
    fn command() -> (&'static str, &'static [&'static str]) {
        const NO_ARGS: &[&str] = &[];
        const START_ARGS: &[&str] = &["/C", "start", ""];

        if cfg!(target_os = "windows") {
            ("cmd", START_ARGS)
        } else if cfg!(target_os = "macos") {
            ("open", NO_ARGS)
        } else {
            ("xdg-open", NO_ARGS)
        }
    }
}

#[async_trait]
impl FileOpener for SystemOpener {
    async fn open(&self, path: &Path) -> Result<()> {
        let (program, args) = Self::command();
        let program = which::which(program).map_err(|_| ThemeError::MissingHandler {
            path: path.to_path_buf(),
        })?;

        let status = Command::new(program).args(args).arg(path).status().await?;
        if !status.success() {
            return Err(ThemeError::MissingHandler {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }
}

/// Severity of a user-facing dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Info,
    Error,
}

/// A user-facing dialog with a set of dismissal actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub kind: DialogKind,
    pub title: String,
    pub text: String,
    pub message: String,
    pub actions: Vec<String>,
}

impl Dialog {
    fn missing_handler(path: &Path) -> Self {
        Self {
            kind: DialogKind::Error,
            title: "No handler found".to_string(),
            text: "No editor is associated with .scss files. Open the file below from \
                   your file manager, pick a text editor and choose to always open this \
                   file type with it."
                .to_string(),
            message: path.display().to_string(),
            actions: vec!["Close".to_string()],
        }
    }
}

/// Receives dialogs meant for the user
pub trait DialogSink: Send + Sync {
    fn show_dialog(&self, dialog: Dialog);
}

/// What happened when editing a style sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Opened(PathBuf),
    MissingHandler(PathBuf),
    Failed(PathBuf),
}

/// Ensure `style_path` exists and open it. Never fails; problems end up in
/// a dialog or the log.
pub async fn edit_style(
    style_path: PathBuf,
    opener: &dyn FileOpener,
    dialogs: &dyn DialogSink,
) -> EditOutcome {
    if let Err(e) = ensure_file(&style_path).await {
        error!(path = %style_path.display(), error = %e, "failed to create style file");
        return EditOutcome::Failed(style_path);
    }

    match opener.open(&style_path).await {
        Ok(()) => {
            info!(path = %style_path.display(), "Opened theme style in editor");
            EditOutcome::Opened(style_path)
        }
        Err(ThemeError::MissingHandler { path }) => {
            dialogs.show_dialog(Dialog::missing_handler(&path));
            EditOutcome::MissingHandler(style_path)
        }
        Err(e) => {
            error!(path = %style_path.display(), error = %e, "failed to open");
            EditOutcome::Failed(style_path)
        }
    }
}

async fn ensure_file(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    OpenOptions::new().create(true).append(true).open(path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::io;
    use tempfile::TempDir;

    enum Behavior {
        Succeed,
        Missing,
        Broken,
    }

    struct FakeOpener {
        behavior: Behavior,
        opened: Mutex<Vec<PathBuf>>,
    }

    impl FakeOpener {
        fn new(behavior: Behavior) -> Self {
            Self {
                behavior,
                opened: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl FileOpener for FakeOpener {
        async fn open(&self, path: &Path) -> Result<()> {
            self.opened.lock().push(path.to_path_buf());
            match self.behavior {
                Behavior::Succeed => Ok(()),
                Behavior::Missing => Err(ThemeError::MissingHandler {
                    path: path.to_path_buf(),
                }),
                Behavior::Broken => Err(io::Error::new(io::ErrorKind::Other, "boom").into()),
            }
        }
    }

    #[derive(Default)]
    struct RecordingDialogs(Mutex<Vec<Dialog>>);

    impl DialogSink for RecordingDialogs {
        fn show_dialog(&self, dialog: Dialog) {
            self.0.lock().push(dialog);
        }
    }

    #[tokio::test]
    async fn test_creates_file_and_opens_it() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("mine").join("style.scss");
        let opener = FakeOpener::new(Behavior::Succeed);
        let dialogs = RecordingDialogs::default();

        let outcome = edit_style(path.clone(), &opener, &dialogs).await;

        assert_eq!(outcome, EditOutcome::Opened(path.clone()));
        assert!(path.is_file());
        assert_eq!(*opener.opened.lock(), vec![path]);
        assert!(dialogs.0.lock().is_empty());
    }

    #[tokio::test]
    async fn test_existing_content_is_preserved() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("style.scss");
        std::fs::write(&path, "body {}").unwrap();

        edit_style(path.clone(), &FakeOpener::new(Behavior::Succeed), &RecordingDialogs::default())
            .await;
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "body {}");
    }

    #[tokio::test]
    async fn test_missing_handler_shows_dialog() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("style.scss");
        let dialogs = RecordingDialogs::default();

        let outcome = edit_style(path.clone(), &FakeOpener::new(Behavior::Missing), &dialogs).await;

        assert_eq!(outcome, EditOutcome::MissingHandler(path.clone()));
        let shown = dialogs.0.lock();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].kind, DialogKind::Error);
        assert_eq!(shown[0].title, "No handler found");
        assert_eq!(shown[0].message, path.display().to_string());
        assert_eq!(shown[0].actions, vec!["Close".to_string()]);
    }

    #[tokio::test]
    async fn test_other_failures_are_swallowed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("style.scss");
        let dialogs = RecordingDialogs::default();

        let outcome = edit_style(path.clone(), &FakeOpener::new(Behavior::Broken), &dialogs).await;

        assert_eq!(outcome, EditOutcome::Failed(path));
        assert!(dialogs.0.lock().is_empty());
    }
}
