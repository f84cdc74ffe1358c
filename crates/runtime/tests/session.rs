use std::sync::{Arc, Mutex};

use game_content::ContentFactory;
use game_core::{
    BoardPosition, CombatAction, CombatError, CombatEvent, EntityId, GameConfig, ItemId,
    MachineError, OpponentTemplateId, Outcome, Phase, Player, SkillId,
};
use runtime::{
    BoardCollaborator, Event, EventBus, FileSnapshotRepository, GameSession, InMemorySnapshotRepo,
    OracleManager, PhaseEvent, RuntimeError, ScriptedInput, SnapshotRepository, Topic,
};

const STRIKE: SkillId = SkillId(1);
const FIREBALL: SkillId = SkillId(2);
const MEND: SkillId = SkillId(3);
const POTION: ItemId = ItemId(1);
const KEY: ItemId = ItemId(3);
const GOBLIN: OpponentTemplateId = OpponentTemplateId(1);

fn content() -> (OracleManager, GameConfig) {
    OracleManager::load(ContentFactory::bundled().data_dir()).expect("bundled content loads")
}

fn memory_session() -> (GameSession, Arc<InMemorySnapshotRepo>) {
    let (oracles, config) = content();
    let repo = Arc::new(InMemorySnapshotRepo::new());
    let session = GameSession::new_game(config, oracles, Some(repo.clone()), EventBus::new())
        .expect("new game");
    (session, repo)
}

fn goblin() -> Option<EntityId> {
    Some(EntityId::opponent(0))
}

fn drain(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[derive(Clone, Default)]
struct RecordingBoard {
    resumed: Arc<Mutex<Vec<BoardPosition>>>,
}

impl BoardCollaborator for RecordingBoard {
    fn on_exploration_resume(&self, _player: &Player, position: BoardPosition) {
        self.resumed.lock().unwrap().push(position);
    }
}

#[test]
fn defeat_by_repeated_hits_ends_in_game_over() {
    let (mut session, repo) = memory_session();
    session.enter_encounter(&[GOBLIN]).unwrap();

    let mut health = Vec::new();
    for _ in 0..3 {
        let outcome = session.submit_action(CombatAction::Wait).unwrap();
        for event in &outcome.events {
            if let CombatEvent::Damaged { target, .. } = event {
                assert_eq!(*target, EntityId::PLAYER);
            }
        }
        health.push(match session.machine().encounter() {
            Some(engine) => engine.state().player().unwrap().health.current,
            None => session.state().player.health.current,
        });
    }

    assert_eq!(health, vec![12, 4, 0]);
    assert_eq!(session.phase(), Phase::GameOver);
    assert_eq!(session.last_outcome(), Some(Outcome::Defeat));

    let (sequence, saved) = repo.latest().unwrap().unwrap();
    assert_eq!(saved.phase, Phase::GameOver);
    assert_eq!(sequence, saved.sequence);
}

#[test]
fn insufficient_resource_leaves_encounter_unchanged() {
    let (mut session, _) = memory_session();
    session.learn_skill(FIREBALL).unwrap();
    session.enter_encounter(&[GOBLIN]).unwrap();

    // 10 -> 7 -> 4 resource; Mend's cooldown expires before the next turn.
    session.submit_action(CombatAction::skill(MEND, None)).unwrap();
    session.submit_action(CombatAction::skill(MEND, None)).unwrap();

    let before = session.machine().encounter().unwrap().state().clone();
    assert_eq!(before.player().unwrap().resource.current, 4);

    let error = session
        .submit_action(CombatAction::skill(FIREBALL, None))
        .unwrap_err();
    assert!(matches!(
        error,
        RuntimeError::Machine(MachineError::Combat(CombatError::InsufficientResource {
            required: 5,
            available: 4,
            ..
        }))
    ));
    assert!(error.is_recoverable());
    assert_eq!(session.machine().encounter().unwrap().state(), &before);
    assert_eq!(session.phase(), Phase::Encounter);

    // The menu is presented again and a valid action goes through.
    session
        .submit_action(CombatAction::skill(STRIKE, goblin()))
        .unwrap();
}

#[test]
fn clearing_every_opponent_in_one_action_wins_immediately() {
    let (mut session, repo) = memory_session();
    session.learn_skill(FIREBALL).unwrap();
    session.enter_encounter(&[GOBLIN, GOBLIN]).unwrap();

    let outcome = session
        .submit_action(CombatAction::skill(FIREBALL, None))
        .unwrap();

    assert_eq!(outcome.concluded(), Some(Outcome::Victory));
    let defeated = outcome
        .events
        .iter()
        .filter(|event| matches!(event, CombatEvent::Defeated { .. }))
        .count();
    assert_eq!(defeated, 2);
    assert!(
        !outcome
            .events
            .iter()
            .any(|event| matches!(event, CombatEvent::TurnStarted { actor, .. } if *actor != EntityId::PLAYER))
    );

    let state = session.state();
    assert_eq!(state.phase, Phase::Exploration);
    assert_eq!(state.player.experience, 60);
    assert_eq!(state.player.inventory.count(POTION), 4);
    assert_eq!(state.player.resource.current, 5);
    assert_eq!(state.player.health.current, 20);

    let (_, saved) = repo.latest().unwrap().unwrap();
    assert_eq!(&saved, state);
}

#[test]
fn restart_after_defeat_reloads_the_encounter_checkpoint() {
    let (mut session, repo) = memory_session();
    session.move_to(BoardPosition::new(2, 3)).unwrap();
    session.enter_encounter(&[GOBLIN]).unwrap();
    let checkpoint = repo.latest_in_phase(Phase::Exploration).unwrap().unwrap().1;

    for _ in 0..3 {
        session.submit_action(CombatAction::Wait).unwrap();
    }
    assert_eq!(session.phase(), Phase::GameOver);
    let game_over_sequence = session.state().sequence;

    let transition = session.restart().unwrap();
    assert_eq!(transition.from, Phase::GameOver);
    assert_eq!(transition.to, Phase::Exploration);
    assert_eq!(session.state().sequence, game_over_sequence + 1);
    assert_eq!(session.state().player, checkpoint.player);
    assert_eq!(session.state().board_position(), BoardPosition::new(2, 3));

    assert!(matches!(
        session.restart(),
        Err(RuntimeError::Machine(MachineError::WrongPhase { .. }))
    ));
}

#[test]
fn fatal_error_aborts_to_the_pre_encounter_snapshot() {
    let (oracles, config) = content();
    let mut config = config;
    config.combat.max_turns = 2;
    let bus = EventBus::new();
    let mut phase_events = bus.subscribe(Topic::Phase);
    let repo = Arc::new(InMemorySnapshotRepo::new());
    let mut session = GameSession::new_game(config, oracles, Some(repo.clone()), bus).unwrap();

    session.enter_encounter(&[GOBLIN]).unwrap();
    let error = session.submit_action(CombatAction::Wait).unwrap_err();

    assert!(matches!(
        error,
        RuntimeError::Machine(MachineError::EncounterAborted { .. })
    ));
    assert!(!error.is_recoverable());
    assert_eq!(session.phase(), Phase::Exploration);
    assert_eq!(session.state().player.health.current, 20);
    assert!(session.machine().encounter().is_none());

    let events = drain(&mut phase_events);
    assert!(events.iter().any(|event| matches!(
        event,
        Event::Phase(PhaseEvent::EncounterAborted { .. })
    )));
    let (_, saved) = repo.latest().unwrap().unwrap();
    assert_eq!(saved.phase, Phase::Exploration);
}

#[test]
fn fleeing_returns_to_the_board() {
    let (oracles, config) = content();
    let board = RecordingBoard::default();
    let mut session = GameSession::new_game(config, oracles, None, EventBus::new())
        .unwrap()
        .with_board(board.clone());

    session.move_to(BoardPosition::new(6, 1)).unwrap();
    session.enter_encounter(&[GOBLIN]).unwrap();
    let outcome = session.submit_action(CombatAction::Flee).unwrap();

    assert_eq!(outcome.concluded(), Some(Outcome::Fled));
    assert_eq!(session.phase(), Phase::Exploration);
    assert_eq!(session.state().player.experience, 0);
    assert_eq!(*board.resumed.lock().unwrap(), vec![BoardPosition::new(6, 1)]);
}

#[test]
fn events_are_published_per_topic_in_order() {
    let (oracles, config) = content();
    let bus = EventBus::new();
    let mut combat = bus.subscribe(Topic::Combat);
    let mut progression = bus.subscribe(Topic::Progression);
    let mut phase = bus.subscribe(Topic::Phase);
    let mut session = GameSession::new_game(config, oracles, None, bus).unwrap();

    session.enter_encounter(&[GOBLIN]).unwrap();
    session
        .submit_action(CombatAction::skill(STRIKE, goblin()))
        .unwrap();
    session
        .submit_action(CombatAction::skill(STRIKE, goblin()))
        .unwrap();

    let combat = drain(&mut combat);
    assert!(matches!(
        combat.first(),
        Some(Event::Combat(CombatEvent::TurnStarted { actor: EntityId::PLAYER, turn: 1, .. }))
    ));
    assert!(matches!(
        combat.last(),
        Some(Event::Combat(CombatEvent::EncounterConcluded {
            outcome: Outcome::Victory,
            ..
        }))
    ));

    let progression = drain(&mut progression);
    assert!(!progression.is_empty());

    let phase = drain(&mut phase);
    let changes: Vec<_> = phase
        .iter()
        .filter_map(|event| match event {
            Event::Phase(PhaseEvent::Changed { from, to, .. }) => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(changes, vec![
        (Phase::Exploration, Phase::Encounter),
        (Phase::Encounter, Phase::Exploration),
    ]);
}

#[test]
fn victory_flag_ends_the_game() {
    let (mut session, repo) = memory_session();
    let victory_flag = session.machine().config().victory_flag.clone();

    assert!(session.set_flag("gate_opened", true).unwrap().is_none());
    let transition = session.set_flag(&victory_flag, true).unwrap().unwrap();

    assert_eq!(transition.to, Phase::Victory);
    assert_eq!(session.phase(), Phase::Victory);
    assert_eq!(repo.latest().unwrap().unwrap().1.phase, Phase::Victory);
    assert!(session.enter_encounter(&[GOBLIN]).is_err());
}

#[test]
fn snapshot_round_trips_through_the_file_repository() {
    let dir = tempfile::tempdir().unwrap();
    let (oracles, config) = content();

    let saved = {
        let repo = Arc::new(FileSnapshotRepository::new(dir.path()).unwrap());
        let mut session =
            GameSession::new_game(config.clone(), oracles.clone(), Some(repo), EventBus::new())
                .unwrap();
        session.move_to(BoardPosition::new(9, -4)).unwrap();
        session.acquire_item(KEY, 1).unwrap();
        session.equip(ItemId(2)).unwrap();
        session.set_flag("bridge_lowered", true).unwrap();
        session.grant_experience(40).unwrap();
        session.save().unwrap();
        session.state().clone()
    };

    let repo = Arc::new(FileSnapshotRepository::new(dir.path()).unwrap());
    let resumed = GameSession::load_or_new(config, oracles, repo, EventBus::new()).unwrap();

    assert_eq!(resumed.phase(), Phase::Exploration);
    assert_eq!(resumed.state().board_position(), BoardPosition::new(9, -4));
    assert_eq!(resumed.state().player, saved.player);
    assert_eq!(resumed.state(), &saved);
}

#[test]
fn corrupt_save_falls_back_to_a_new_game() {
    let dir = tempfile::tempdir().unwrap();
    let (oracles, config) = content();
    let repo = Arc::new(FileSnapshotRepository::new(dir.path()).unwrap());
    {
        let mut session = GameSession::new_game(
            config.clone(),
            oracles.clone(),
            Some(repo.clone()),
            EventBus::new(),
        )
        .unwrap();
        session.enter_encounter(&[GOBLIN]).unwrap();
    }
    assert_eq!(repo.list_sequences().unwrap(), vec![0, 1]);
    std::fs::write(repo.state_path(1), b"not a snapshot").unwrap();

    let bus = EventBus::new();
    let mut phase = bus.subscribe(Topic::Phase);
    let session = GameSession::load_or_new(config, oracles, repo.clone(), bus).unwrap();

    assert_eq!(session.phase(), Phase::Exploration);
    assert_eq!(session.state().sequence, 2);
    assert_eq!(session.state().player.experience, 0);
    assert!(repo.exists(2));
    assert!(drain(&mut phase).iter().any(|event| matches!(
        event,
        Event::Phase(PhaseEvent::SaveDiscarded { .. })
    )));
}

#[tokio::test]
async fn drive_encounter_reprompts_after_rejected_actions() {
    let (mut session, _) = memory_session();
    session.enter_encounter(&[GOBLIN]).unwrap();

    let input = ScriptedInput::new([
        CombatAction::item(KEY, None),
        CombatAction::skill(STRIKE, goblin()),
        CombatAction::skill(STRIKE, goblin()),
        CombatAction::Wait,
    ]);
    let outcome = session.drive_encounter(&input).await.unwrap();

    assert_eq!(outcome, Outcome::Victory);
    assert_eq!(input.rejections().await.len(), 1);
    assert_eq!(input.remaining().await, 1);
    assert_eq!(session.phase(), Phase::Exploration);
    assert_eq!(session.state().player.health.current, 12);
    assert_eq!(session.state().player.inventory.count(POTION), 3);
}

#[tokio::test]
async fn drive_encounter_stops_when_input_runs_out() {
    let (mut session, _) = memory_session();
    session.enter_encounter(&[GOBLIN]).unwrap();

    let input = ScriptedInput::new([CombatAction::Wait]);
    let error = session.drive_encounter(&input).await.unwrap_err();

    assert!(matches!(error, RuntimeError::InputClosed));
    assert_eq!(session.phase(), Phase::Encounter);
}

#[test]
fn restart_skips_a_corrupt_game_over_save() {
    let dir = tempfile::tempdir().unwrap();
    let (oracles, config) = content();
    let repo = Arc::new(FileSnapshotRepository::new(dir.path()).unwrap());
    let mut session =
        GameSession::new_game(config, oracles, Some(repo.clone()), EventBus::new()).unwrap();

    session.acquire_item(KEY, 1).unwrap();
    session.enter_encounter(&[GOBLIN]).unwrap();
    for _ in 0..3 {
        session.submit_action(CombatAction::Wait).unwrap();
    }
    assert_eq!(session.phase(), Phase::GameOver);
    assert_eq!(repo.list_sequences().unwrap(), vec![0, 1, 2]);
    std::fs::write(repo.state_path(2), b"not a snapshot").unwrap();

    let transition = session.restart().unwrap();

    assert_eq!(transition.to, Phase::Exploration);
    assert_eq!(session.state().player.inventory.count(KEY), 1);
    assert_eq!(session.state().sequence, 3);
}

#[test]
fn fleeing_from_a_boss_succeeds() {
    let (mut session, _) = memory_session();
    session.enter_encounter(&[OpponentTemplateId(10)]).unwrap();

    let outcome = session.submit_action(CombatAction::Flee).unwrap();

    assert_eq!(outcome.concluded(), Some(Outcome::Fled));
    assert_eq!(session.last_outcome(), Some(Outcome::Fled));
    assert_eq!(session.phase(), Phase::Exploration);
}

#[test]
fn merged_subscription_sees_the_phase_change_after_the_final_blow() {
    let (oracles, config) = content();
    let bus = EventBus::new();
    let mut all = bus.subscribe_all();
    let mut session = GameSession::new_game(config, oracles, None, bus).unwrap();

    session.enter_encounter(&[GOBLIN]).unwrap();
    drain(&mut all);
    session
        .submit_action(CombatAction::skill(STRIKE, goblin()))
        .unwrap();
    session
        .submit_action(CombatAction::skill(STRIKE, goblin()))
        .unwrap();

    let events = drain(&mut all);
    let position = |wanted: fn(&Event) -> bool| events.iter().position(wanted).unwrap();
    let concluded = position(|e| {
        matches!(e, Event::Combat(CombatEvent::EncounterConcluded { .. }))
    });
    let progressed = position(|e| matches!(e, Event::Progression(_)));
    let changed = position(|e| {
        matches!(e, Event::Phase(PhaseEvent::Changed { to: Phase::Exploration, .. }))
    });
    assert!(concluded < progressed);
    assert!(progressed < changed);
    assert!(events.iter().any(|e| e.topic() == Topic::Combat));
}
