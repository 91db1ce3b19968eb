/// Game integration tests — full playthroughs through the public API.

use narrative_trail::core::game::{GameError, IntentOutcome, NarrativeGame};
use narrative_trail::core::story::Story;
use narrative_trail::core::template::Template;
use narrative_trail::core::typewriter::RevealEvent;
use narrative_trail::schema::map::{ConsequenceTable, SegmentSpec, WaypointAtlas};
use narrative_trail::schema::mood::{Mood, Sprite};
use narrative_trail::schema::story::{BeatText, BranchTag, Choice, StoryBeat};
use proptest::prelude::*;

fn fixed(s: &str) -> BeatText {
    BeatText::Fixed(Template::parse(s).unwrap())
}

fn question(body: &str) -> StoryBeat {
    StoryBeat {
        title: fixed("Guide"),
        body: fixed(body),
        choices: Some(vec![
            Choice::new("Yes", BranchTag::Positive),
            Choice::new("Maybe", BranchTag::Neutral),
            Choice::new("No", BranchTag::Negative),
        ]),
    }
}

/// Four beats: three questions and a mood-dependent ending.
fn four_beat_story() -> Story {
    Story {
        script: vec![
            question("First question?"),
            question("Second question?"),
            question("Third question?"),
            StoryBeat {
                title: BeatText::ByMood {
                    happy: Template::parse("Bright").unwrap(),
                    sad: Template::parse("Dim").unwrap(),
                    neutral: Template::parse("Still").unwrap(),
                },
                body: BeatText::ByMood {
                    happy: Template::parse("Well done.\n\nFinal score: {score}").unwrap(),
                    sad: Template::parse("Next time.\n\nFinal score: {score}").unwrap(),
                    neutral: Template::parse("Hmm.\n\nFinal score: {score}").unwrap(),
                },
                choices: None,
            },
        ],
        consequences: ConsequenceTable::new()
            .with(0, BranchTag::Positive, vec![SegmentSpec::new("green", &["C", "D", "E"])])
            .with(0, BranchTag::Neutral, vec![SegmentSpec::new("amber", &["B", "C", "D"])])
            .with(1, BranchTag::Positive, vec![SegmentSpec::new("green", &["E", "A"])]),
        atlas: WaypointAtlas::new()
            .with("A", 10.0, 10.0, "Alpha")
            .with("B", 20.0, 20.0, "Beta")
            .with("C", 30.0, 30.0, "Gamma")
            .with("D", 40.0, 40.0, "Delta")
            .with("E", 50.0, 50.0, "Epsilon"),
        intro: SegmentSpec::new("blue", &["A", "B"]),
    }
}

fn build(story: Story) -> NarrativeGame {
    NarrativeGame::builder().with_story(story).build().unwrap()
}

fn finish_reveal(game: &mut NarrativeGame) {
    let id = game.reveal_id().expect("active reveal");
    while game.tick(id).is_some() {}
}

fn play(game: &mut NarrativeGame, branches: &[BranchTag]) {
    for &branch in branches {
        finish_reveal(game);
        assert_eq!(game.choose(branch).unwrap(), IntentOutcome::Accepted);
    }
    finish_reveal(game);
}

fn pin_ids(game: &NarrativeGame) -> Vec<String> {
    game.snapshot()
        .pins
        .iter()
        .map(|p| p.id.as_str().to_string())
        .collect()
}

#[test]
fn all_positive_ends_happy() {
    let mut game = build(four_beat_story());
    play(&mut game, &[BranchTag::Positive; 3]);

    assert_eq!(game.score(), 3);
    assert!(game.is_ending());
    assert_eq!(game.ending_mood(), Some(Mood::Happy));
    let snap = game.snapshot();
    assert_eq!(snap.title, "Bright");
    assert!(snap.displayed.contains("Final score: 3"));
    assert_eq!(snap.sprite, Sprite::Happy);
    assert!(snap.can_continue());
}

#[test]
fn all_negative_ends_sad() {
    let mut game = build(four_beat_story());
    play(&mut game, &[BranchTag::Negative; 3]);

    assert_eq!(game.score(), -3);
    assert_eq!(game.ending_mood(), Some(Mood::Sad));
    assert!(game.snapshot().displayed.contains("Final score: -3"));
}

#[test]
fn balanced_choices_end_neutral() {
    let mut game = build(four_beat_story());
    play(
        &mut game,
        &[BranchTag::Positive, BranchTag::Neutral, BranchTag::Negative],
    );

    assert_eq!(game.score(), 0);
    // The last choice was negative, but the ending follows the score.
    assert_eq!(game.interim_mood(), Mood::Sad);
    assert_eq!(game.ending_mood(), Some(Mood::Neutral));
    assert_eq!(game.snapshot().mood, Mood::Neutral);
    assert!(game.body().ends_with("Final score: 0"));
}

#[test]
fn next_on_ending_resets_everything() {
    let mut game = build(four_beat_story());
    play(&mut game, &[BranchTag::Positive; 3]);
    assert!(game.path().len() > 1);

    assert_eq!(game.next().unwrap(), IntentOutcome::Accepted);
    assert_eq!(game.step(), 0);
    assert_eq!(game.score(), 0);
    assert_eq!(game.interim_mood(), Mood::Neutral);
    assert_eq!(game.path().segments(), &[SegmentSpec::new("blue", &["A", "B"])]);
    assert!(game.is_revealing());
    assert_eq!(game.displayed(), "");
}

#[test]
fn consequence_appends_pins_in_order() {
    let mut game = build(four_beat_story());
    assert_eq!(pin_ids(&game), vec!["A", "B"]);
    finish_reveal(&mut game);
    game.choose(BranchTag::Positive).unwrap();
    assert_eq!(pin_ids(&game), vec!["A", "B", "C", "D", "E"]);
}

#[test]
fn consequence_starting_at_current_pin_is_not_duplicated() {
    let mut game = build(four_beat_story());
    finish_reveal(&mut game);
    game.choose(BranchTag::Neutral).unwrap();
    assert_eq!(pin_ids(&game), vec!["A", "B", "C", "D"]);
    assert_eq!(game.path().len(), 2);
}

#[test]
fn choice_without_consequence_keeps_path() {
    let mut game = build(four_beat_story());
    finish_reveal(&mut game);
    game.choose(BranchTag::Negative).unwrap();
    assert_eq!(game.path().len(), 1);
    assert_eq!(game.step(), 1);
}

#[test]
fn intents_during_reveal_change_nothing() {
    let mut game = build(four_beat_story());
    let id = game.reveal_id().unwrap();
    game.tick(id);
    let before = game.state().clone();

    for _ in 0..5 {
        assert_eq!(
            game.choose(BranchTag::Positive).unwrap(),
            IntentOutcome::IgnoredWhileRevealing
        );
        assert_eq!(game.next().unwrap(), IntentOutcome::IgnoredWhileRevealing);
    }
    assert_eq!(game.state(), &before);
    assert_eq!(game.displayed(), "F");
}

#[test]
fn invalid_choice_is_reported_without_mutation() {
    let mut story = four_beat_story();
    story.script[0].choices = Some(vec![Choice::new("Yes", BranchTag::Positive)]);
    let mut game = build(story);
    finish_reveal(&mut game);
    let before = game.state().clone();

    let err = game.choose(BranchTag::Negative).unwrap_err();
    assert!(matches!(
        err,
        GameError::InvalidChoice { step: 0, branch: BranchTag::Negative, .. }
    ));
    assert_eq!(game.state(), &before);
    // The game stays playable after a rejected intent.
    assert_eq!(game.choose(BranchTag::Positive).unwrap(), IntentOutcome::Accepted);
}

#[test]
fn choose_on_ending_is_invalid() {
    let mut game = build(four_beat_story());
    play(&mut game, &[BranchTag::Neutral; 3]);
    assert!(matches!(
        game.choose(BranchTag::Neutral),
        Err(GameError::InvalidChoice { step: 3, .. })
    ));
}

#[test]
fn stale_finish_cannot_unlock_new_beat() {
    let mut game = build(four_beat_story());
    finish_reveal(&mut game);
    let old = game.reveal_id().unwrap();
    game.choose(BranchTag::Positive).unwrap();

    assert_eq!(game.tick(old), None);
    assert!(game.is_revealing());
    assert_eq!(
        game.choose(BranchTag::Positive).unwrap(),
        IntentOutcome::IgnoredWhileRevealing
    );
}

#[test]
fn empty_body_does_not_block() {
    let mut story = four_beat_story();
    story.script[1].body = fixed("");
    let mut game = build(story);
    finish_reveal(&mut game);
    game.choose(BranchTag::Positive).unwrap();
    assert!(!game.is_revealing());
    assert_eq!(game.choose(BranchTag::Neutral).unwrap(), IntentOutcome::Accepted);
}

#[test]
fn advance_drives_reveal_by_time() {
    let mut game = NarrativeGame::builder()
        .with_story(four_beat_story())
        .reveal_interval(std::time::Duration::from_millis(10))
        .build()
        .unwrap();
    let events = game.advance(std::time::Duration::from_millis(35));
    assert_eq!(events.len(), 3);
    assert_eq!(game.displayed(), "Fir");
    let events = game.advance(std::time::Duration::from_secs(5));
    assert!(matches!(events.last(), Some(RevealEvent::Finished { .. })));
    assert!(!game.is_revealing());
}

fn branch() -> impl Strategy<Value = BranchTag> {
    prop_oneof![
        Just(BranchTag::Positive),
        Just(BranchTag::Neutral),
        Just(BranchTag::Negative),
    ]
}

proptest! {
    #[test]
    fn score_moves_by_branch_delta(picks in proptest::collection::vec(branch(), 0..12)) {
        let mut game = build(four_beat_story());
        let mut expected = 0i64;
        let mut last_path_len = game.path().len();

        for pick in picks {
            finish_reveal(&mut game);
            if game.is_ending() {
                game.next().unwrap();
                expected = 0;
                prop_assert_eq!(game.path().len(), 1);
                last_path_len = 1;
                continue;
            }
            let before = game.score();
            game.choose(pick).unwrap();
            prop_assert_eq!(game.score() - before, pick.score_delta());
            expected += pick.score_delta();
            prop_assert!(game.path().len() >= last_path_len);
            last_path_len = game.path().len();
        }
        prop_assert_eq!(game.score(), expected);
    }

    #[test]
    fn ending_mood_follows_score_sign(picks in proptest::collection::vec(branch(), 3)) {
        let mut game = build(four_beat_story());
        play(&mut game, &picks);
        let score: i64 = picks.iter().map(BranchTag::score_delta).sum();
        prop_assert_eq!(game.ending_mood(), Some(Mood::from_score(score)));
        let needle = format!("Final score: {}", score);
        prop_assert!(game.body().contains(&needle));
    }
}
