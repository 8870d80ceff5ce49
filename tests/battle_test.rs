//! End-to-end attack scenarios against a file-backed database

mod common;

use std::sync::Arc;

use airpg::game::{BattleEngine, BattleError, ReportLine};
use common::TestGame;

#[tokio::test]
async fn test_killing_blow_scenario() {
    let game = TestGame::start().await.expect("Failed to start game");
    game.fighter(1, 0, 5, 0).await;
    let monster = game.monster("Gobelin", 10, 3, 1).await;

    let engine = BattleEngine::new(game.pool());
    let report = engine.attack(1).await.expect("attack failed");

    assert_eq!(
        report.to_string(),
        "**<@1>** inflige 2 (5+0-3) points de dégâts à **Gobelin**.\n\
         L'adversaire est vaincu ! Le combat rapporte 10 points d'expérience partagés entre :\n\
         - <@1>\n"
    );
    assert_eq!(game.monster_hp(monster).await, -1);
    assert_eq!(game.participation_count(monster).await, 1);

    let c = game.character(1).await;
    assert_eq!(c.experience, 10);
    assert_eq!(c.level, 1);
}

#[tokio::test]
async fn test_level_up_scenario() {
    let game = TestGame::start().await.expect("Failed to start game");
    game.fighter(1, 0, 5, 0).await;
    game.monster("Troll", 100, 0, 1).await;

    let engine = BattleEngine::new(game.pool());
    let report = engine.attack(1).await.expect("attack failed");

    assert_eq!(
        report.lines().last(),
        Some(&ReportLine::Participant {
            character_id: 1,
            levels_gained: 1
        })
    );
    assert!(report.to_string().ends_with("- <@1>: Gain de niveau ! \n"));
    assert!(!report.to_string().contains(" x"));

    let c = game.character(1).await;
    assert_eq!(c.experience, 100);
    assert_eq!(c.level, 2);
    assert_eq!(c.skill_points, 5 + 5);
}

#[tokio::test]
async fn test_small_reward_keeps_level() {
    let game = TestGame::start().await.expect("Failed to start game");
    game.fighter(1, 0, 5, 0).await;
    game.monster("Rat", 25, 0, 1).await;

    let engine = BattleEngine::new(game.pool());
    engine.attack(1).await.expect("attack failed");

    let c = game.character(1).await;
    assert_eq!(c.experience, 25);
    assert_eq!(c.level, airpg::game::level_for_experience(25));
    assert_eq!(c.skill_points, 5);
}

#[tokio::test]
async fn test_reward_shared_by_all_attackers() {
    let game = TestGame::start().await.expect("Failed to start game");
    game.fighter(1, 0, 2, 0).await;
    game.fighter(2, 0, 2, 0).await;
    game.fighter(3, 0, 2, 0).await;
    let monster = game.monster("Ogre", 10, 0, 7).await;

    let engine = BattleEngine::new(game.pool());
    engine.attack(1).await.expect("attack 1");
    engine.attack(2).await.expect("attack 2");
    engine.attack(1).await.expect("attack 3");
    let report = engine.attack(3).await.expect("attack 4");
    assert!(report.is_victory());
    assert_eq!(game.participation_count(monster).await, 4);

    // 10 / 3 = 3 each, one point of experience is lost
    for id in 1..=3 {
        assert_eq!(game.character(id).await.experience, 3);
    }
    assert!(report.to_string().ends_with("- <@1>\n- <@2>\n- <@3>\n"));
}

#[tokio::test]
async fn test_failed_participation_rolls_back() {
    let game = TestGame::start().await.expect("Failed to start game");
    game.fighter(1, 0, 5, 0).await;
    let monster = game.monster("Gobelin", 10, 0, 20).await;
    game.inject_failure("fail_participation", "INSERT", "battle_participation")
        .await;

    let engine = BattleEngine::new(game.pool());
    let result = engine.attack(1).await;
    assert!(matches!(result, Err(BattleError::Store(_))));

    assert_eq!(game.monster_hp(monster).await, 20);
    assert_eq!(game.participation_count(monster).await, 0);
}

#[tokio::test]
async fn test_failed_settlement_rolls_back() {
    let game = TestGame::start().await.expect("Failed to start game");
    let before_1 = game.fighter(1, 0, 5, 0).await;
    let before_2 = game.fighter(2, 90, 5, 0).await;
    let monster = game.monster("Gobelin", 100, 0, 6).await;

    let engine = BattleEngine::new(game.pool());
    engine.attack(2).await.expect("first attack");
    assert_eq!(game.monster_hp(monster).await, 1);

    game.inject_failure("fail_progress", "UPDATE", "characters")
        .await;

    let result = engine.attack(1).await;
    assert!(matches!(result, Err(BattleError::Store(_))));

    // Killing blow, participation and rewards all undone
    assert_eq!(game.monster_hp(monster).await, 1);
    assert_eq!(game.participation_count(monster).await, 1);
    assert_eq!(game.character(1).await, before_1);
    assert_eq!(game.character(2).await, before_2);
}

#[tokio::test]
async fn test_errors_leave_no_state() {
    let game = TestGame::start().await.expect("Failed to start game");
    let monster = game.monster("Gobelin", 10, 0, 20).await;

    let engine = BattleEngine::new(game.pool());
    let result = engine.attack(404).await;
    assert!(matches!(result, Err(BattleError::CharacterNotFound(404))));
    assert_eq!(game.monster_hp(monster).await, 20);
    assert_eq!(game.participation_count(monster).await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_simultaneous_killing_attacks_settle_once() {
    let game = TestGame::start().await.expect("Failed to start game");
    game.fighter(1, 0, 3, 0).await;
    game.fighter(2, 0, 4, 0).await;
    // Exactly the sum of both hits
    let monster = game.monster("Hydre", 50, 0, 7).await;

    let engine = Arc::new(BattleEngine::new(game.pool()));
    let first = tokio::spawn({
        let engine = engine.clone();
        async move { engine.attack(1).await }
    });
    let second = tokio::spawn({
        let engine = engine.clone();
        async move { engine.attack(2).await }
    });

    let first = first.await.expect("join").expect("attack 1");
    let second = second.await.expect("join").expect("attack 2");

    let victories = [&first, &second]
        .iter()
        .filter(|report| report.is_victory())
        .count();
    assert_eq!(victories, 1);

    assert_eq!(game.monster_hp(monster).await, 0);
    assert_eq!(game.participation_count(monster).await, 2);
    assert_eq!(game.character(1).await.experience, 25);
    assert_eq!(game.character(2).await.experience, 25);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_attacks_lose_no_damage() {
    let game = TestGame::start().await.expect("Failed to start game");
    for id in 1..=6 {
        game.fighter(id, 0, 2, 3).await;
    }
    let monster = game.monster("Dragon", 600, 1, 10_000).await;

    let engine = Arc::new(BattleEngine::with_seed(game.pool(), 11));
    let mut handles = Vec::new();
    for id in 1..=6 {
        for _ in 0..5 {
            let engine = engine.clone();
            handles.push(tokio::spawn(async move { engine.attack(id).await }));
        }
    }

    let mut dealt = 0;
    for handle in handles {
        let report = handle.await.expect("join").expect("attack");
        for line in report.lines() {
            if let ReportLine::Attack { damage, .. } = line {
                dealt += damage;
            }
        }
    }

    assert_eq!(game.monster_hp(monster).await, 10_000 - dealt);
    assert_eq!(game.participation_count(monster).await, 30);
}
