use std::collections::BTreeSet;

use impostor_core::{
    DictionaryError, GameConfig, GameSetup, GameWord, Player, RandomSelector,
    RoleAssignmentEngine, RoundAssignment, SessionState, WordDictionary, WordProvider,
    WordSource,
};

struct OfflineDictionary;

impl WordDictionary for OfflineDictionary {
    async fn list_words_by_language(
        &self,
        _language: &str,
    ) -> Result<Vec<GameWord>, DictionaryError> {
        Err(DictionaryError::RequestFailed("offline".to_string()))
    }
}

fn players(n: u32) -> Vec<Player> {
    (0..n).map(|i| Player::new(i, format!("Player {}", i + 1))).collect()
}

/// セットアップから数ラウンド進めて、各ラウンドの割り当てが有効であることを確認
#[tokio::test]
async fn test_session_rounds_with_custom_words() {
    let config = GameConfig::new(
        players(4),
        1,
        ["Car", "Dog"].iter().map(|w| w.to_string()).collect(),
    )
    .unwrap();
    let provider = WordProvider::new(OfflineDictionary);
    let mut engine = RoleAssignmentEngine::new(RandomSelector::seeded(77));
    let mut state = SessionState::new();

    let impostors = engine.assign_for_new_session(&config, &mut state).unwrap();
    let pick = provider
        .get_word("en", config.custom_words(), engine.selector_mut())
        .await;
    let mut round = RoundAssignment::new(impostors, pick);
    assert_eq!(round.impostor_indices.len(), 1);
    assert!(round.secret_word == "Car" || round.secret_word == "Dog");
    assert_eq!(round.word_source, WordSource::Custom);

    for _ in 0..9 {
        let previous = round.impostor_indices.clone();
        let impostors = engine.assign_for_restart(&config, &mut state).unwrap();
        let pick = provider
            .get_word("en", config.custom_words(), engine.selector_mut())
            .await;
        round = RoundAssignment::new(impostors, pick);

        assert_eq!(round.impostor_indices.len(), 1);
        assert!(round.impostor_indices.iter().all(|&i| i < 4));
        assert!(round.secret_word == "Car" || round.secret_word == "Dog");
        if state.games_played_count() % 5 != 0 {
            assert!(round.impostor_indices.is_disjoint(&previous));
        }
    }
    assert_eq!(state.games_played_count(), 10);
}

#[tokio::test]
async fn test_offline_dictionary_still_yields_a_word() {
    let config = GameSetup {
        player_count: Some(9),
        impostor_count: 2,
        ..Default::default()
    }
    .into_config()
    .unwrap();
    let provider = WordProvider::new(OfflineDictionary);
    let mut engine = RoleAssignmentEngine::new(RandomSelector::seeded(9));
    let mut state = SessionState::new();

    for _ in 0..20 {
        let impostors = engine.assign_for_new_session(&config, &mut state).unwrap();
        assert_eq!(impostors.len(), 2);
        assert!(impostors.iter().all(|&i| i < 9));

        let pick = provider
            .get_word("ja", &BTreeSet::new(), engine.selector_mut())
            .await;
        assert!(pick.used_fallback());
        assert!(!pick.word.is_empty());
        assert!(provider.fallback().words_for("ja").contains(&pick.word));
    }
}

#[test]
fn test_new_session_after_end_starts_from_scratch() {
    let config = GameConfig::new(players(5), 2, BTreeSet::new()).unwrap();
    let mut engine = RoleAssignmentEngine::new(RandomSelector::seeded(31));
    let mut state = SessionState::new();

    engine.assign_for_new_session(&config, &mut state).unwrap();
    engine.assign_for_restart(&config, &mut state).unwrap();
    engine.assign_for_restart(&config, &mut state).unwrap();
    state.end();
    assert!(engine.assign_for_restart(&config, &mut state).is_err());

    // 新しいセットアップからは再開できる
    let mut fresh = SessionState::new();
    engine.assign_for_new_session(&config, &mut fresh).unwrap();
    assert_eq!(fresh.games_played_count(), 1);
    assert!(fresh.last_impostor_indices().is_empty());
}
