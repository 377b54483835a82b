use bookshelf_core::{
    BookField, BookForm, BookStorage, FormMode, FormOutcome, KeyValueStore, MemoryKeyValueStore,
    Notice, Notifier, ShelfController, ShelfCounts, ShelfRenderer, ShelfView, CLEAR_ALL_PROMPT,
    STORAGE_KEY,
};

#[derive(Debug, Clone, PartialEq)]
enum Frame {
    Shelves(ShelfView),
    Counts(ShelfCounts),
}

#[derive(Default)]
struct RecordingRenderer {
    frames: Vec<Frame>,
}

impl RecordingRenderer {
    fn last_shelves(&self) -> &ShelfView {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| match frame {
                Frame::Shelves(view) => Some(view),
                Frame::Counts(_) => None,
            })
            .unwrap()
    }

    fn last_counts(&self) -> ShelfCounts {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| match frame {
                Frame::Counts(counts) => Some(*counts),
                Frame::Shelves(_) => None,
            })
            .unwrap()
    }
}

impl ShelfRenderer for RecordingRenderer {
    fn render(&mut self, view: &ShelfView) {
        self.frames.push(Frame::Shelves(view.clone()));
    }

    fn render_counts(&mut self, counts: ShelfCounts) {
        self.frames.push(Frame::Counts(counts));
    }
}

struct ScriptedNotifier {
    notices: Vec<Notice>,
    prompts: Vec<String>,
    answer: bool,
}

impl ScriptedNotifier {
    fn answering(answer: bool) -> Self {
        Self {
            notices: Vec::new(),
            prompts: Vec::new(),
            answer,
        }
    }
}

impl Notifier for ScriptedNotifier {
    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        self.prompts.push(prompt.to_string());
        self.answer
    }
}

type Controller = ShelfController<RecordingRenderer, ScriptedNotifier>;

fn controller_with(kv: &MemoryKeyValueStore, answer: bool) -> Controller {
    let mut controller = ShelfController::new(
        BookStorage::new(Box::new(kv.clone())),
        RecordingRenderer::default(),
        ScriptedNotifier::answering(answer),
    );
    controller.start();
    controller
}

fn fill(controller: &mut Controller, title: &str, author: &str, year: &str, complete: bool) {
    let form = controller.form_mut();
    form.title = title.to_string();
    form.author = author.to_string();
    form.year = year.to_string();
    form.is_complete = complete;
}

fn stored_titles(kv: &MemoryKeyValueStore) -> Vec<String> {
    let raw = kv.get(STORAGE_KEY).unwrap().unwrap_or_else(|| "[]".to_string());
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|book| book["title"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn submit_in_create_mode_adds_renders_persists_and_resets() {
    let kv = MemoryKeyValueStore::new();
    let mut controller = controller_with(&kv, true);
    let frames_before = controller.renderer().frames.len();

    fill(&mut controller, " Dune ", "Frank Herbert", "1965", false);
    let outcome = controller.submit();

    let FormOutcome::Added(book) = outcome else {
        panic!("expected Added");
    };
    assert_eq!(book.title, "Dune");
    assert_eq!(controller.mode(), FormMode::Create);
    assert_eq!(controller.form(), &BookForm::default());
    assert_eq!(stored_titles(&kv), vec!["Dune"]);

    let new_frames = &controller.renderer().frames[frames_before..];
    assert!(matches!(new_frames[0], Frame::Shelves(ref view) if view.incomplete.len() == 1));
    assert!(matches!(new_frames[1], Frame::Counts(counts) if counts.total == 1));
    assert_eq!(
        controller.notifier().notices,
        vec![Notice::Added {
            title: "Dune".to_string()
        }]
    );
}

#[test]
fn duplicate_submit_keeps_input_and_collection() {
    let kv = MemoryKeyValueStore::new();
    let mut controller = controller_with(&kv, true);
    fill(&mut controller, "Dune", "Frank Herbert", "1965", false);
    controller.submit();

    fill(&mut controller, "dune", "FRANK HERBERT", "1965", true);
    let outcome = controller.submit();

    assert!(matches!(outcome, FormOutcome::Duplicate { .. }));
    assert_eq!(controller.collection().len(), 1);
    assert_eq!(controller.form().title, "dune");
    assert_eq!(controller.mode(), FormMode::Create);
    assert_eq!(
        controller.notifier().notices.last(),
        Some(&Notice::DuplicateBook)
    );
}

#[test]
fn missing_field_is_reported_and_nothing_is_saved() {
    let kv = MemoryKeyValueStore::new();
    let mut controller = controller_with(&kv, true);
    fill(&mut controller, "Dune", "  ", "1965", false);

    let outcome = controller.submit();
    assert!(matches!(outcome, FormOutcome::Invalid(_)));
    assert!(controller.collection().is_empty());
    assert!(kv.get(STORAGE_KEY).unwrap().is_none());
    assert_eq!(
        controller.notifier().notices,
        vec![Notice::MissingField(BookField::Author)]
    );
}

#[test]
fn edit_populates_form_and_update_returns_to_create() {
    let kv = MemoryKeyValueStore::new();
    let mut controller = controller_with(&kv, true);
    fill(&mut controller, "Dune", "Frank Herbert", "1965", false);
    let FormOutcome::Added(book) = controller.submit() else {
        panic!("expected Added");
    };

    assert!(controller.begin_edit(book.id));
    assert_eq!(controller.mode(), FormMode::Edit { book_id: book.id });
    assert_eq!(controller.form().year, "1965");

    controller.form_mut().title = "Dune Messiah".to_string();
    controller.form_mut().year = "1969".to_string();
    let outcome = controller.submit();

    let FormOutcome::Updated(updated) = outcome else {
        panic!("expected Updated");
    };
    assert_eq!(updated.id, book.id);
    assert_eq!(updated.year, 1969);
    assert_eq!(controller.mode(), FormMode::Create);
    assert_eq!(controller.collection().len(), 1);
    assert_eq!(stored_titles(&kv), vec!["Dune Messiah"]);
}

#[test]
fn entering_edit_twice_binds_only_latest_target() {
    let kv = MemoryKeyValueStore::new();
    let mut controller = controller_with(&kv, true);
    fill(&mut controller, "Dune", "Frank Herbert", "1965", false);
    let FormOutcome::Added(first) = controller.submit() else {
        panic!("expected Added");
    };
    fill(&mut controller, "Emma", "Jane Austen", "1815", false);
    let FormOutcome::Added(second) = controller.submit() else {
        panic!("expected Added");
    };

    controller.begin_edit(first.id);
    controller.begin_edit(second.id);
    controller.form_mut().title = "Persuasion".to_string();
    controller.submit();

    let books = controller.collection().books();
    assert_eq!(books[0].title, "Dune");
    assert_eq!(books[1].title, "Persuasion");
}

#[test]
fn invalid_edit_stays_in_edit_mode() {
    let kv = MemoryKeyValueStore::new();
    let mut controller = controller_with(&kv, true);
    fill(&mut controller, "Dune", "Frank Herbert", "1965", false);
    let FormOutcome::Added(book) = controller.submit() else {
        panic!("expected Added");
    };

    controller.begin_edit(book.id);
    controller.form_mut().title.clear();
    let outcome = controller.submit();

    assert!(matches!(outcome, FormOutcome::Invalid(_)));
    assert_eq!(controller.mode(), FormMode::Edit { book_id: book.id });
    assert_eq!(controller.collection().books()[0].title, "Dune");
}

#[test]
fn editing_a_deleted_book_is_silently_discarded() {
    let kv = MemoryKeyValueStore::new();
    let mut controller = controller_with(&kv, true);
    fill(&mut controller, "Dune", "Frank Herbert", "1965", false);
    let FormOutcome::Added(book) = controller.submit() else {
        panic!("expected Added");
    };

    controller.begin_edit(book.id);
    controller.delete(book.id);
    let notices_before = controller.notifier().notices.len();

    assert_eq!(controller.submit(), FormOutcome::Discarded);
    assert_eq!(controller.mode(), FormMode::Create);
    assert_eq!(controller.notifier().notices.len(), notices_before);
}

#[test]
fn complete_undo_and_delete_update_shelves_and_storage() {
    let kv = MemoryKeyValueStore::new();
    let mut controller = controller_with(&kv, true);
    fill(&mut controller, "Dune", "Frank Herbert", "1965", false);
    let FormOutcome::Added(book) = controller.submit() else {
        panic!("expected Added");
    };

    controller.complete(book.id);
    assert_eq!(controller.renderer().last_shelves().complete.len(), 1);
    assert_eq!(controller.renderer().last_counts().complete, 1);

    controller.undo(book.id);
    assert_eq!(controller.renderer().last_shelves().incomplete.len(), 1);

    let removed = controller.delete(book.id).unwrap();
    assert_eq!(removed.id, book.id);
    assert!(stored_titles(&kv).is_empty());
    assert_eq!(
        controller.notifier().notices.last(),
        Some(&Notice::Removed {
            title: "Dune".to_string()
        })
    );
}

#[test]
fn actions_on_unknown_ids_do_nothing() {
    let kv = MemoryKeyValueStore::new();
    let mut controller = controller_with(&kv, true);
    let frames_before = controller.renderer().frames.len();

    controller.complete(404);
    controller.undo(404);
    assert!(controller.delete(404).is_none());
    assert!(!controller.begin_edit(404));

    assert_eq!(controller.renderer().frames.len(), frames_before);
    assert!(controller.notifier().notices.is_empty());
    assert!(kv.get(STORAGE_KEY).unwrap().is_none());
}

#[test]
fn clear_all_requires_confirmation() {
    let kv = MemoryKeyValueStore::new();
    let mut declined = controller_with(&kv, false);
    fill(&mut declined, "Dune", "Frank Herbert", "1965", false);
    declined.submit();

    assert!(!declined.clear_all());
    assert_eq!(declined.collection().len(), 1);
    assert_eq!(declined.notifier().prompts, vec![CLEAR_ALL_PROMPT]);

    let mut accepted = controller_with(&kv, true);
    assert_eq!(accepted.collection().len(), 1);
    assert!(accepted.clear_all());
    assert!(accepted.collection().is_empty());
    assert!(stored_titles(&kv).is_empty());
    assert_eq!(accepted.notifier().notices.last(), Some(&Notice::Cleared));
}

#[test]
fn search_renders_filtered_view_but_counts_stay_full() {
    let kv = MemoryKeyValueStore::new();
    let mut controller = controller_with(&kv, true);
    fill(&mut controller, "The Lord of the Rings", "Tolkien", "1954", false);
    controller.submit();
    fill(&mut controller, "Dune", "Frank Herbert", "1965", true);
    controller.submit();
    let saved = kv.get(STORAGE_KEY).unwrap();

    let hits = controller.search("  LORD ");
    assert_eq!(hits.len(), 1);

    let view = controller.renderer().last_shelves();
    assert_eq!(view.len(), 1);
    assert_eq!(view.incomplete[0].title, "The Lord of the Rings");
    assert_eq!(controller.renderer().last_counts().total, 2);
    assert_eq!(controller.collection().len(), 2);
    assert_eq!(kv.get(STORAGE_KEY).unwrap(), saved);
}

#[test]
fn start_restores_previous_session() {
    let kv = MemoryKeyValueStore::new();
    {
        let mut first = controller_with(&kv, true);
        fill(&mut first, "Dune", "Frank Herbert", "1965", true);
        first.submit();
    }

    let second = controller_with(&kv, true);
    assert_eq!(second.collection().len(), 1);
    assert!(second.collection().books()[0].is_complete);
    assert_eq!(second.renderer().last_counts().complete, 1);
}

#[test]
fn unavailable_storage_notifies_once_and_keeps_working_in_memory() {
    let mut controller = ShelfController::new(
        BookStorage::unavailable(),
        RecordingRenderer::default(),
        ScriptedNotifier::answering(true),
    );
    controller.start();
    controller.start();

    fill(&mut controller, "Dune", "Frank Herbert", "1965", false);
    assert!(matches!(controller.submit(), FormOutcome::Added(_)));

    let unavailable = controller
        .notifier()
        .notices
        .iter()
        .filter(|notice| **notice == Notice::StorageUnavailable)
        .count();
    assert_eq!(unavailable, 1);
    assert_eq!(controller.collection().len(), 1);
}

#[test]
fn unreadable_snapshot_starts_empty_and_is_reported() {
    let mut kv = MemoryKeyValueStore::new();
    kv.set(STORAGE_KEY, "definitely not json").unwrap();

    let controller = controller_with(&kv, true);
    assert!(controller.collection().is_empty());
    assert_eq!(
        controller.notifier().notices,
        vec![Notice::SnapshotUnreadable]
    );
    assert_eq!(
        kv.get(STORAGE_KEY).unwrap().as_deref(),
        Some("definitely not json")
    );
}

#[test]
fn one_bad_record_does_not_lose_the_rest_of_the_shelf() {
    let mut kv = MemoryKeyValueStore::new();
    kv.set(
        STORAGE_KEY,
        r#"[{"id":1,"title":"Dune","author":"Frank Herbert","year":1965,"isComplete":false},
            {"id":2,"title":"Emma","author":"Jane Austen","year":null,"isComplete":false}]"#,
    )
    .unwrap();

    let mut controller = controller_with(&kv, true);
    assert_eq!(controller.collection().len(), 1);
    assert_eq!(
        controller.notifier().notices,
        vec![Notice::RecordsSkipped { count: 1 }]
    );

    fill(&mut controller, "Ubik", "Philip K. Dick", "1969", false);
    controller.submit();
    assert_eq!(stored_titles(&kv), vec!["Dune", "Ubik"]);
}
