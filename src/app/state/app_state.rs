use crate::app::history::{CommandHistory, HistoryEvent};
use crate::app::CommandLog;
use crate::core::{AssetCatalog, Robot};
use crate::interaction::DragState;
use crate::mediator::{MediatorContext, RobotMediator};
use crate::picking::Picker;
use crate::scene::{LoadQueue, RepresentationCache, RepresentationLoader, SceneGraph};
use crate::shared::EditorOptions;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::{SelectionState, UiState, ViewState};

/// Von den History-Beobachtern gesetzte Marker.
#[derive(Debug, Default)]
struct HistoryWatch {
    updated: Cell<bool>,
    part_removed: Cell<bool>,
}

/// Hauptzustand einer Editor-Sitzung.
///
/// Wird explizit an Controller und Handler gereicht; es gibt keinen globalen Zustand.
pub struct AppState {
    /// Einmalig geladener Asset-Katalog
    pub catalog: AssetCatalog,
    /// Das Domänenmodell
    pub robot: Robot,
    /// Undo/Redo-History (einziger Mutationsweg für `robot`)
    pub history: CommandHistory,
    /// Visueller Szenengraph
    pub scene: Rc<RefCell<SceneGraph>>,
    /// Ausstehende Repräsentations-Anfragen
    pub loads: LoadQueue,
    /// Bereits geladene Repräsentationen
    pub representations: RepresentationCache,
    /// Gemeinsamer Kontext aller Mediatoren
    pub mediators: MediatorContext,
    /// Mediator des Roboters (`None`, falls der Container nicht angelegt werden konnte)
    pub robot_mediator: Option<Rc<RefCell<RobotMediator>>>,
    /// Selection-State
    pub selection: SelectionState,
    /// Laufende Drag-Geste
    pub drag: DragState,
    /// View-State
    pub view: ViewState,
    /// UI-State
    pub ui: UiState,
    /// Picking über den ID-Puffer
    pub picker: Picker,
    /// Laufzeit-Optionen
    pub options: EditorOptions,
    /// Verlauf ausgeführter Commands
    pub command_log: CommandLog,
    history_watch: Rc<HistoryWatch>,
}

impl AppState {
    /// Erstellt eine Sitzung mit Standard-Optionen.
    pub fn new(catalog: AssetCatalog, loader: Box<dyn RepresentationLoader>) -> Self {
        Self::with_options(catalog, loader, EditorOptions::default())
    }

    /// Erstellt eine leere Sitzung: leerer Roboter, Szene mit Roboter-Container.
    pub fn with_options(
        catalog: AssetCatalog,
        loader: Box<dyn RepresentationLoader>,
        options: EditorOptions,
    ) -> Self {
        let scene = Rc::new(RefCell::new(SceneGraph::new()));
        {
            let mut graph = scene.borrow_mut();
            graph.set_default_color(options.default_part_color);
            graph.set_highlight_color(options.highlight_color);
        }
        let loads = LoadQueue::new();
        let mediators = MediatorContext::new(Rc::clone(&scene), loads.clone());

        let robot = Robot::new();
        let robot_mediator = RobotMediator::attach(&mediators, &robot);
        if robot_mediator.is_none() {
            log::error!("Roboter-Container konnte nicht angelegt werden");
        }

        let history = CommandHistory::new_with_capacity(options.history_depth);
        let history_watch = Rc::new(HistoryWatch::default());
        let watch = Rc::clone(&history_watch);
        history
            .events()
            .add_observer(HistoryEvent::Updated, move |_| watch.updated.set(true));
        let watch = Rc::clone(&history_watch);
        history
            .events()
            .add_observer(HistoryEvent::AnyPartRemoved, move |_| {
                watch.part_removed.set(true)
            });

        let mut state = Self {
            catalog,
            robot,
            history,
            scene,
            loads,
            representations: RepresentationCache::new(loader),
            mediators,
            robot_mediator,
            selection: SelectionState::new(),
            drag: DragState::default(),
            view: ViewState::new(),
            ui: UiState::new(),
            picker: Picker::default(),
            options,
            command_log: CommandLog::new(),
            history_watch,
        };
        state.refresh_ui();
        state
    }

    /// Liefert abgeschlossene Ladevorgänge an ihre Mediatoren aus.
    /// Vom Host einmal pro Frame aufzurufen.
    pub fn pump_asset_loads(&mut self) -> usize {
        self.loads.pump(&mut self.representations)
    }

    /// Wertet die History-Benachrichtigungen seit dem letzten Aufruf aus.
    pub fn sync_after_history(&mut self) {
        if self.history_watch.part_removed.take() {
            self.drop_stale_selection();
        }
        if self.history_watch.updated.take() {
            self.refresh_ui();
        }
        self.sync_highlight();
    }

    /// Berechnet Undo/Redo-Flags und Katalog-Verfügbarkeit neu.
    pub fn refresh_ui(&mut self) {
        self.ui.can_undo = self.history.can_undo();
        self.ui.can_redo = self.history.can_redo();
        self.ui.draggable_assets = self.catalog.draggable_assets(
            self.robot.has_root_part(),
            &self.robot.available_slot_types(),
        );
    }

    /// Hebt den Container des selektierten Bauteils hervor (nicht während eines Drags).
    pub fn sync_highlight(&mut self) {
        if self.drag.is_dragging() {
            return;
        }
        let mut scene = self.scene.borrow_mut();
        let container = self
            .selection
            .selected_part
            .and_then(|id| scene.find_part_container(id));
        self.selection.container = container;
        scene.set_highlight(container);
    }

    fn drop_stale_selection(&mut self) {
        if let Some(id) = self.selection.selected_part {
            if !self.robot.contains(id) {
                log::debug!("Selektion verworfen: Bauteil {} nicht mehr im Roboter", id);
                self.selection.clear();
            }
        }
    }

    /// Gibt zurück, ob das Asset aktuell gezogen werden darf.
    pub fn is_draggable(&self, asset_name: &str) -> bool {
        self.ui.draggable_assets.contains(asset_name)
    }

    /// Anzahl der Bauteile im Roboter (für UI-Anzeige).
    pub fn part_count(&self) -> usize {
        self.robot.part_count()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}
