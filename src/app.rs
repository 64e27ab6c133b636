/// The iced application
///
/// Screen routing, the message loop, and the glue between the review
/// engine's synchronous mutations and the async collaborator calls
/// driven through `Task::perform`.

use iced::widget::{button, column, container, horizontal_space, row, text};
use iced::{Alignment, Element, Length, Point, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CachedImage, ImageCache, Tier};
use crate::constants::{CARD_STACK_COUNT, SWIPE_ANIMATION_MS, THUMBNAIL_PRELOAD};
use crate::library::loader::FileImageLoader;
use crate::library::scan::FolderSource;
use crate::library::store::FileAssetStore;
use crate::state::photo::Photo;
use crate::state::review::{self, ReviewEngine};
use crate::state::settings::Settings;
use crate::ui;
use crate::ui::cards::{CardStackCoordinator, ExitToken, ReleaseOutcome};

/// Which screen the app is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    /// No library folder chosen yet
    Welcome,
    /// Library fetch in flight
    Loading,
    /// Card stack + filmstrip
    Review,
    /// Queued-for-deletion grid
    DeleteReview,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked the folder picker button
    PickFolder,
    /// Background library fetch completed
    PhotosLoaded(Vec<Photo>),
    /// Pointer moved over the card area
    CardPointerMoved(Point),
    /// Pointer pressed on the card area
    CardPressed,
    /// Pointer released; the coordinator decides settle vs. exit
    CardReleased,
    /// Exit animation finished; commit the deferred decision
    SwipeResolved(ExitToken),
    /// A prefetch or on-demand image load resolved (cache already
    /// updated; this just triggers a redraw)
    ImageFetched(Option<(String, CachedImage)>),
    /// Pull the most recently queued photo back to the stack front
    UndoDelete,
    /// Filmstrip tap: make this photo the next to review
    JumpTo(Photo),
    OpenReview,
    CloseReview,
    /// Review-sheet restore: keep a queued photo
    Restore(Photo),
    /// Batch-delete everything in the queue
    CommitDeletes,
    /// Asset store finished; Ok carries the committed snapshot
    CommitFinished(Result<Vec<Photo>, String>),
    /// Clear all decisions and reload the library
    ResetSession,
}

/// Main application state
struct PhotoTriage {
    engine: ReviewEngine,
    cards: CardStackCoordinator,
    settings: Settings,
    screen: Screen,
    /// Last commit error, shown on the review sheet
    error: Option<String>,
    /// A batch delete is in flight; queue interaction is blocked
    /// until it reports back
    committing: bool,
}

impl PhotoTriage {
    fn new() -> (Self, Task<Message>) {
        let settings = Settings::load();
        let folder = settings.library_folder.clone();

        let engine = Self::engine_for(folder.clone().unwrap_or_default());
        println!("🗂️  Photo Triage initialized");

        let app = PhotoTriage {
            engine,
            cards: CardStackCoordinator::new(),
            settings,
            screen: if folder.is_some() {
                Screen::Loading
            } else {
                Screen::Welcome
            },
            error: None,
            committing: false,
        };

        let task = if folder.is_some() {
            app.load_task()
        } else {
            Task::none()
        };
        (app, task)
    }

    /// A fresh engine (and with it a fresh session) for this folder.
    fn engine_for(folder: PathBuf) -> ReviewEngine {
        ReviewEngine::new(
            Arc::new(FolderSource::new(folder)),
            Arc::new(FileImageLoader),
            Arc::new(FileAssetStore),
            Arc::new(ImageCache::new()),
        )
    }

    fn load_task(&self) -> Task<Message> {
        let source = self.engine.source();
        Task::perform(async move { source.fetch_all().await }, Message::PhotosLoaded)
    }

    /// Queue image loads for everything the UI is about to show: the
    /// visible card stack at full size and the leading filmstrip
    /// entries at thumbnail size. Cache hits are skipped up front.
    fn prefetch(&self) -> Task<Message> {
        let cache = self.engine.cache();
        let loader = self.engine.loader();
        let mut tasks = Vec::new();

        for photo in self.engine.stack().iter().take(CARD_STACK_COUNT) {
            if cache.get(Tier::Full, &photo.id).is_none() {
                tasks.push(Task::perform(
                    review::fetch_full(cache.clone(), loader.clone(), photo.clone()),
                    Message::ImageFetched,
                ));
            }
        }

        for photo in self.engine.all_photos().iter().take(THUMBNAIL_PRELOAD) {
            if cache.get(Tier::Thumbnail, &photo.id).is_none() {
                tasks.push(Task::perform(
                    review::fetch_thumbnail(cache.clone(), loader.clone(), photo.clone()),
                    Message::ImageFetched,
                ));
            }
        }

        Task::batch(tasks)
    }

    /// Thumbnails for the review sheet, which shows the whole queue.
    fn prefetch_queued_thumbnails(&self) -> Task<Message> {
        let cache = self.engine.cache();
        let loader = self.engine.loader();
        let tasks: Vec<Task<Message>> = self
            .engine
            .queued_photos()
            .into_iter()
            .filter(|p| cache.get(Tier::Thumbnail, &p.id).is_none())
            .map(|p| {
                Task::perform(
                    review::fetch_thumbnail(cache.clone(), loader.clone(), p),
                    Message::ImageFetched,
                )
            })
            .collect();
        Task::batch(tasks)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickFolder => {
                let folder = FileDialog::new()
                    .set_title("Select Folder with Photos")
                    .pick_folder();

                if let Some(folder_path) = folder {
                    self.settings.library_folder = Some(folder_path.clone());
                    self.settings.save();

                    self.engine = Self::engine_for(folder_path);
                    self.cards = CardStackCoordinator::new();
                    self.error = None;
                    self.screen = Screen::Loading;
                    return self.load_task();
                }

                Task::none()
            }
            Message::PhotosLoaded(photos) => {
                let count = self.engine.install_photos(photos);
                println!("✅ Loaded {} photos for review", count);
                self.screen = Screen::Review;
                self.prefetch()
            }
            Message::CardPointerMoved(position) => {
                self.cards.pointer_moved(position);
                Task::none()
            }
            Message::CardPressed => {
                self.cards.begin_drag();
                Task::none()
            }
            Message::CardReleased => {
                let Some(top) = self.engine.stack().first().cloned() else {
                    return Task::none();
                };

                match self.cards.release(&top) {
                    ReleaseOutcome::Exit(token) => Task::perform(
                        async move {
                            tokio::time::sleep(Duration::from_millis(SWIPE_ANIMATION_MS)).await;
                            token
                        },
                        Message::SwipeResolved,
                    ),
                    ReleaseOutcome::Settle => Task::none(),
                }
            }
            Message::SwipeResolved(token) => {
                self.cards.resolve(&token, &mut self.engine);
                self.prefetch()
            }
            Message::ImageFetched(_) => Task::none(),
            Message::UndoDelete => {
                self.engine.undo_last_delete();
                self.prefetch()
            }
            Message::JumpTo(photo) => {
                self.engine.move_to_front(&photo);
                self.prefetch()
            }
            Message::OpenReview => {
                self.screen = Screen::DeleteReview;
                self.prefetch_queued_thumbnails()
            }
            Message::CloseReview => {
                self.screen = Screen::Review;
                self.prefetch()
            }
            Message::Restore(photo) => {
                // The in-flight batch snapshot was already taken; a
                // restore now could not stop those files from being
                // deleted, so the queue is frozen until the store
                // reports back.
                if !self.committing {
                    self.engine.restore(&photo);
                }
                Task::none()
            }
            Message::CommitDeletes => {
                if self.committing || !self.engine.has_queued() {
                    return Task::none();
                }
                self.committing = true;
                self.error = None;

                let snapshot = self.engine.queued_snapshot();
                let store = self.engine.store();
                Task::perform(
                    async move { store.delete_batch(&snapshot).await.map(|_| snapshot) },
                    Message::CommitFinished,
                )
            }
            Message::CommitFinished(result) => {
                self.committing = false;
                match result {
                    Ok(snapshot) => {
                        self.engine.finish_commit(&snapshot);
                        self.error = None;
                        self.screen = Screen::Review;
                    }
                    Err(reason) => {
                        eprintln!("⚠️  Batch delete failed: {}", reason);
                        self.error = Some(format!("Failed to delete photos: {}", reason));
                    }
                }
                Task::none()
            }
            Message::ResetSession => {
                self.engine.clear_session();
                self.cards = CardStackCoordinator::new();
                self.error = None;
                self.screen = Screen::Loading;
                self.load_task()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        match self.screen {
            Screen::Welcome => self.welcome_view(),
            Screen::Loading => centered_message("Loading photos…"),
            Screen::Review => self.review_view(),
            Screen::DeleteReview => {
                ui::review_sheet::view(&self.engine, self.error.as_deref(), self.committing)
            }
        }
    }

    fn welcome_view(&self) -> Element<'_, Message> {
        let content = column![
            text("Photo Triage").size(48),
            text("Swipe right to keep, left to delete. Nothing is removed until you commit.")
                .size(16),
            button("Choose Photo Folder")
                .on_press(Message::PickFolder)
                .padding(10),
        ]
        .spacing(20)
        .padding(40)
        .align_x(Alignment::Center);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn review_view(&self) -> Element<'_, Message> {
        if self.engine.all_photos().is_empty() {
            let content = column![
                text("No photos found in this folder").size(24),
                button("Choose Another Folder").on_press(Message::PickFolder),
            ]
            .spacing(16)
            .align_x(Alignment::Center);

            return container(content)
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into();
        }

        let queued = self.engine.queued_count();
        let header = row![
            text(format!("{} to review", self.engine.stack().len())).size(14),
            text(format!("{} reviewed", self.engine.total_reviewed())).size(14),
            text(format!("{} kept", self.engine.kept_count())).size(14),
            text(format!("{} to delete", queued)).size(14),
            horizontal_space(),
            button(text("Undo delete").size(14))
                .on_press_maybe(self.engine.has_queued().then_some(Message::UndoDelete)),
            button(text(format!("Review deletions ({})", queued)).size(14))
                .on_press_maybe(self.engine.has_queued().then_some(Message::OpenReview)),
            button(text("Reset").size(14)).on_press(Message::ResetSession),
            button(text("Change folder").size(14)).on_press(Message::PickFolder),
        ]
        .spacing(12)
        .padding(12)
        .align_y(Alignment::Center);

        column![
            header,
            ui::cards::view(&self.engine, &self.cards),
            ui::filmstrip::view(&self.engine),
        ]
        .spacing(8)
        .padding(8)
        .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn centered_message(message: &str) -> Element<'_, Message> {
    container(text(message).size(20))
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

/// Run the application until the window closes.
pub fn run() -> iced::Result {
    iced::application("Photo Triage", PhotoTriage::update, PhotoTriage::view)
        .theme(PhotoTriage::theme)
        .centered()
        .run_with(PhotoTriage::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::review::testing::{engine_with, photo};

    async fn app_with_queued(committing: bool) -> PhotoTriage {
        let mut engine = engine_with(&["p1", "p2"]).await;
        engine.mark_for_deletion(&photo("p1"));

        PhotoTriage {
            engine,
            cards: CardStackCoordinator::new(),
            settings: Settings::default(),
            screen: Screen::DeleteReview,
            error: None,
            committing,
        }
    }

    #[tokio::test]
    async fn test_restore_applies_when_no_commit_in_flight() {
        let mut app = app_with_queued(false).await;

        let _ = app.update(Message::Restore(photo("p1")));

        assert_eq!(app.engine.queued_count(), 0);
        assert_eq!(app.engine.kept_count(), 1);
    }

    #[tokio::test]
    async fn test_restore_is_frozen_while_commit_in_flight() {
        let mut app = app_with_queued(true).await;

        let _ = app.update(Message::Restore(photo("p1")));

        assert_eq!(app.engine.queued_count(), 1);
        assert_eq!(app.engine.kept_count(), 0);
    }

    #[tokio::test]
    async fn test_second_commit_request_is_ignored_while_in_flight() {
        let mut app = app_with_queued(true).await;

        let _ = app.update(Message::CommitDeletes);

        // Still marked committing from the first request; the queue
        // snapshot was not retaken.
        assert!(app.committing);
        assert_eq!(app.engine.queued_count(), 1);
    }
}
