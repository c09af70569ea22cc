//! 使用示例剧本的端到端测试

use court_runtime::{
    DialogueEngine, EngineError, HistoryEvent, MAX_HP, NodeKind, Phase, PlayerAction, Script, Step,
    analyze_script,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TRIAL: &str = include_str!("../../assets/scripts/trial.json");

fn trial() -> DialogueEngine {
    DialogueEngine::new(Script::from_json(TRIAL).expect("示例剧本应能加载"))
}

#[test]
fn demo_script_passes_diagnostics() {
    let script = Script::from_json(TRIAL).unwrap();
    let result = analyze_script(&script);
    assert!(result.is_empty(), "{:#?}", result.diagnostics);
}

#[test]
fn perfect_playthrough() {
    let mut engine = trial();

    let actions = [
        PlayerAction::Advance,
        PlayerAction::Advance,
        PlayerAction::choose(0),
        PlayerAction::choose(0),
        PlayerAction::Press,
        PlayerAction::evidence("tv_schedule"),
        PlayerAction::Advance,
    ];
    for action in actions {
        let step = engine.handle(action).unwrap();
        assert!(!step.is_penalty(), "{step:?}");
    }

    assert_eq!(engine.state().current_node_id, "verdict");
    assert_eq!(engine.state().hp, MAX_HP);
    assert!(engine.is_finished());
    assert_eq!(engine.history().mistakes(), 0);
}

#[test]
fn wrong_approach_costs_hp_and_loops_back() {
    let mut engine = trial();
    engine.advance().unwrap();
    engine.advance().unwrap();

    let step = engine.choose(1).unwrap();
    assert_eq!(
        step,
        Step::Moved {
            node_id: "objection_motive".to_string(),
            penalty: true,
            redirected_from: None,
        }
    );
    assert_eq!(engine.state().hp, 4);

    engine.advance().unwrap();
    assert_eq!(engine.state().current_node_id, "motive");
}

#[test]
fn cross_exam_allows_retries_before_penalty() {
    let mut engine = trial();
    engine.advance().unwrap();
    engine.advance().unwrap();
    engine.choose(0).unwrap();
    assert_eq!(engine.current_node().kind, NodeKind::CrossExam);
    assert_eq!(engine.current_node().time_limit, Some(60));

    assert!(matches!(
        engine.choose(1).unwrap(),
        Step::Retry {
            attempts_remaining: 2
        }
    ));
    assert!(matches!(
        engine.choose(2).unwrap(),
        Step::Retry {
            attempts_remaining: 1
        }
    ));
    let step = engine.choose(1).unwrap();
    assert!(step.is_penalty());
    assert_eq!(engine.state().current_node_id, "judge_warning");

    // 超时直接扣血
    engine.advance().unwrap();
    engine.time_expired().unwrap();
    assert_eq!(engine.state().hp, MAX_HP - 2);
}

#[test]
fn running_out_of_hp_ends_trial_until_reset() {
    let mut engine = trial();
    engine.advance().unwrap();
    engine.advance().unwrap();

    for _ in 0..MAX_HP - 1 {
        engine.choose(1).unwrap();
        engine.advance().unwrap();
    }
    assert_eq!(
        engine.choose(1).unwrap(),
        Step::GameOver {
            node_id: "motive".to_string()
        }
    );
    assert_eq!(engine.state().phase, Phase::GameOver);
    assert_eq!(engine.choose(0), Err(EngineError::AlreadyGameOver));
    assert!(
        engine
            .history()
            .events()
            .any(|e| matches!(e, HistoryEvent::GameOver { .. }))
    );

    engine.reset();
    assert_eq!(engine.state().current_node_id, "opening");
    assert_eq!(engine.state().hp, MAX_HP);
    assert_eq!(engine.state().phase, Phase::Playing);
    assert_eq!(engine.state().attempts_remaining, 0);
}

/// 按权重随机抽取一个玩家操作
fn random_action(rng: &mut StdRng) -> PlayerAction {
    match rng.gen_range(0..20) {
        0..=5 => PlayerAction::Advance,
        6..=11 => PlayerAction::choose(rng.gen_range(0..4)),
        12 => PlayerAction::evidence("tv_schedule"),
        13 => PlayerAction::evidence("umbrella"),
        14 | 15 => PlayerAction::Press,
        16 | 17 => PlayerAction::TimeExpired,
        18 => PlayerAction::ToggleAudio,
        _ => PlayerAction::Reset,
    }
}

#[test]
fn random_sessions_keep_invariants() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..200 {
        let mut engine = trial();

        for _ in 0..150 {
            let before = engine.state().clone();
            let action = random_action(&mut rng);
            let is_reset = action == PlayerAction::Reset;

            match engine.handle(action) {
                Ok(step) => {
                    let state = engine.state();
                    if is_reset {
                        assert_eq!(state.hp, MAX_HP);
                    } else {
                        let lost = before.hp - state.hp;
                        assert!(lost <= 1);
                        assert_eq!(lost == 1, step.is_penalty());
                    }
                }
                Err(_) => assert_eq!(engine.state(), &before),
            }

            let state = engine.state();
            assert!(state.hp <= MAX_HP);
            assert_eq!(state.hp == 0, state.phase == Phase::GameOver);
            assert!(engine.script().contains(&state.current_node_id));
        }
    }
}
