use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use num_bigint::BigInt;
use num_rational::BigRational;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::database::SolutionTable;
use crate::expression::FormatError;
use crate::game::{
    AnswerError, DEFAULT_PLAYER, Game, GameError, ManualClock, Status, StatusError,
    validate_submission,
};
use crate::problem::{GenerateError, GenerateMethod, GenerateOptions, Problem};

fn problem(numbers: &[u64]) -> Problem {
    match Problem::new(numbers) {
        Ok(problem) => problem,
        Err(e) => panic!("invalid test problem {:?}: {}", numbers, e),
    }
}

fn sample_table() -> Arc<SolutionTable> {
    let entries = vec![
        (problem(&[0, 0, 0, 6, 7]), 3),
        (problem(&[1, 1, 6, 7, 12]), 25),
        (problem(&[3, 4, 6, 7, 12]), 60),
    ];
    match SolutionTable::from_entries(entries) {
        Ok(table) => Arc::new(table),
        Err(e) => panic!("invalid test table: {}", e),
    }
}

fn new_game() -> (Game<StdRng, ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let game = Game::with_parts(sample_table(), StdRng::seed_from_u64(42), clock.clone());
    (game, clock)
}

fn playing(numbers: Vec<u64>) -> (Game<StdRng, ManualClock>, ManualClock) {
    let (mut game, clock) = new_game();
    assert!(game.generate(&GenerateMethod::Custom(numbers)).is_ok());
    assert!(game.start().is_ok());
    (game, clock)
}

fn require_playing() -> StatusError {
    StatusError::RequireCertainStatus(Status::Playing)
}

#[test]
fn test_accessors_require_playing() {
    let (mut game, _) = new_game();
    assert!(!game.is_playing());
    assert_eq!(game.current_problem(), Err(require_playing()));
    assert_eq!(game.current_solutions(), Err(require_playing()));
    assert_eq!(game.current_solution_number(), Err(require_playing()));
    assert_eq!(game.total_solution_number(), Err(require_playing()));
    assert_eq!(game.player_statistics(), Err(require_playing()));
    assert_eq!(game.elapsed_time(), Err(require_playing()));
    assert_eq!(
        game.solve("123", DEFAULT_PLAYER),
        Err(GameError::Status(require_playing()))
    );
    assert_eq!(game.stop(), Err(GameError::Status(require_playing())));
}

#[test]
fn test_start_requires_generated_problem() {
    let (mut game, _) = new_game();
    assert_eq!(
        game.start(),
        Err(GameError::Status(StatusError::NoPendingProblem))
    );
}

#[test]
fn test_start_twice_fails() {
    let (mut game, _) = playing(vec![3, 4, 6, 7, 12]);
    assert_eq!(
        game.start(),
        Err(GameError::Status(StatusError::RequireCertainStatus(
            Status::Idle
        )))
    );
    assert!(game.is_playing());
}

#[test]
fn test_generate_while_playing_fails() {
    let (mut game, _) = playing(vec![3, 4, 6, 7, 12]);
    let options = GenerateOptions {
        minimum_solutions: Some(1),
        maximum_solutions: Some(2),
        ..GenerateOptions::default()
    };
    assert_eq!(
        game.generate_problem("database", &options),
        Err(GameError::Status(StatusError::RequireCertainStatus(
            Status::Idle
        )))
    );
}

#[test]
fn test_database_generation_and_total() {
    let (mut game, _) = new_game();
    let options = GenerateOptions {
        minimum_solutions: Some(60),
        maximum_solutions: Some(61),
        ..GenerateOptions::default()
    };
    assert_eq!(
        game.generate_problem("database", &options),
        Ok(problem(&[3, 4, 6, 7, 12]))
    );
    assert!(game.start().is_ok());
    assert_eq!(game.current_problem(), Ok(problem(&[3, 4, 6, 7, 12])));
    assert_eq!(game.total_solution_number(), Ok(60));
}

#[test]
fn test_total_is_zero_for_unknown_problem() {
    let (mut game, _) = new_game();
    let method = GenerateMethod::Random {
        minimum: 13,
        maximum: 13,
    };
    assert_eq!(game.generate(&method), Ok(problem(&[13, 13, 13, 13, 13])));
    assert!(game.start().is_ok());
    assert_eq!(game.total_solution_number(), Ok(0));
}

#[test]
fn test_invalid_submissions_leave_history_untouched() {
    let (mut game, _) = playing(vec![3, 4, 6, 7, 12]);
    let rejected: [(&str, u8); 14] = [
        ("", 0x11),
        ("1111111111111111111111111111111", 0x10),
        ("1", 0x20),
        ("1+", 0x11),
        ("1+(", 0x11),
        ("42", 0x15),
        ("1+2+3+4+5+6+7+8+9-3", 0x15),
        ("-1+3", 0x12),
        ("1-(3-1)", 0x20),
        ("1**3", 0x12),
        ("1+3.0", 0x14),
        ("1/0", 0x13),
        ("___123456___", 0x11),
        ("6*7+(12-3*4)*1", 0x15),
    ];
    for (text, code) in rejected {
        match game.solve(text, DEFAULT_PLAYER) {
            Ok(interval) => panic!("{:?} was accepted after {:?}", text, interval),
            Err(e) => assert_eq!(e.code(), code, "{:?} failed with {}", text, e),
        }
    }
    assert_eq!(game.current_solutions(), Ok(vec![]));
    assert!(game.player_statistics().is_ok_and(|s| s.is_empty()));
}

#[test]
fn test_wrong_answer_carries_exact_value() {
    let (mut game, _) = playing(vec![3, 4, 6, 7, 12]);
    let result = game.solve("6/7", DEFAULT_PLAYER);
    assert_eq!(
        result,
        Err(GameError::Answer(AnswerError::WrongAnswer(BigRational::new(
            BigInt::from(6),
            BigInt::from(7)
        ))))
    );
    if let Err(e) = result {
        assert_eq!(e.to_string(), "AnswerError:WrongAnswer[6/7]");
    }
}

#[test]
fn test_unmatched_numbers_reports_used_numbers() {
    let (mut game, _) = playing(vec![3, 4, 6, 7, 12]);
    assert_eq!(
        game.solve("42", DEFAULT_PLAYER),
        Err(GameError::Format(FormatError::UnmatchedNumber(
            "(42)".to_string()
        )))
    );
}

#[test]
fn test_full_session() {
    let (mut game, clock) = playing(vec![3, 4, 6, 7, 12]);

    clock.advance(Duration::from_secs(1));
    assert_eq!(game.solve("6*7+(12-3*4)", 10000), Ok(Duration::from_secs(1)));

    let repeats = ["12/(3*4)*6*7", "6*7*(12 / (3*4))", "(12-3*4)+6*7"];
    let expected = [
        None,
        Some("12/(3*4)*6*7".to_string()),
        Some("6*7+(12-3*4)".to_string()),
    ];
    clock.advance(Duration::from_secs(1));
    for (text, earlier) in repeats.iter().zip(expected) {
        let result = game.solve(text, DEFAULT_PLAYER);
        match earlier {
            None => assert_eq!(result, Ok(Duration::from_secs(1))),
            Some(earlier) => assert_eq!(
                result,
                Err(GameError::Answer(AnswerError::RepeatedAnswer(earlier)))
            ),
        }
    }
    assert_eq!(game.current_solution_number(), Ok(2));

    clock.advance(Duration::from_secs(3));
    assert_eq!(
        game.solve("       （12      +      6  /     3)  *  （7    -   4)", DEFAULT_PLAYER),
        Ok(Duration::from_secs(3))
    );
    assert_eq!(
        game.current_solutions(),
        Ok(vec!["6*7+(12-3*4)", "12/(3*4)*6*7", "(12+6/3)*(7-4)"])
    );

    let statistics = game.player_statistics().map(|s| s.clone());
    let expected_statistics: BTreeMap<i64, Vec<Duration>> = [
        (10000, vec![Duration::from_secs(1)]),
        (
            DEFAULT_PLAYER,
            vec![Duration::from_secs(1), Duration::from_secs(3)],
        ),
    ]
    .into_iter()
    .collect();
    assert_eq!(statistics, Ok(expected_statistics));

    clock.advance(Duration::from_millis(500));
    assert_eq!(game.elapsed_time(), Ok(Duration::from_millis(5500)));
    assert_eq!(game.stop(), Ok(Duration::from_millis(5500)));
    assert!(!game.is_playing());
    assert_eq!(game.current_solutions(), Err(require_playing()));
}

#[test]
fn test_repeated_text_is_rejected() {
    let (mut game, _) = playing(vec![1, 1, 6, 7, 12]);
    assert!(game.solve("((1+12)-(1+6))*7", DEFAULT_PLAYER).is_ok());
    assert_eq!(
        game.solve("((1+12)-(1+6))*7", DEFAULT_PLAYER),
        Err(GameError::Answer(AnswerError::RepeatedAnswer(
            "((1+12)-(1+6))*7".to_string()
        )))
    );
}

#[test]
fn test_normalized_symbols_are_equivalent() {
    let (mut game, _) = playing(vec![3, 4, 6, 7, 12]);
    assert!(game.solve("6×7+(12−3×4)", DEFAULT_PLAYER).is_ok());
    assert_eq!(
        game.solve("6*7+(12-3*4)", DEFAULT_PLAYER),
        Err(GameError::Answer(AnswerError::RepeatedAnswer(
            "6*7+(12-3*4)".to_string()
        )))
    );
}

#[test]
fn test_intervals_sum_to_elapsed() {
    let (mut game, clock) = playing(vec![1, 1, 6, 7, 12]);
    let answers = [
        "((1+12)-(1+6))*7",
        "6*(((12-7)+1)+1)",
        "((12*(1-1))+6)*7",
        "12/(1+((1-6)/7))",
        "12+((1-6)*(1-7))",
        "((1+12)-6)*(7-1)",
        "((1+12)-7)*(6+1)",
        "12-(((1+1)-7)*6)",
        "(6*((7+1)+1))-12",
    ];
    let mut total = Duration::ZERO;
    for answer in answers {
        clock.advance(Duration::from_secs(1));
        match game.solve(answer, DEFAULT_PLAYER) {
            Ok(interval) => {
                assert_eq!(interval, Duration::from_secs(1));
                total += interval;
            }
            Err(e) => panic!("{} rejected: {}", answer, e),
        }
    }
    assert_eq!(game.stop(), Ok(total));
}

#[test]
fn test_real_clock_intervals() {
    let mut game = Game::new(sample_table());
    assert!(game.generate(&GenerateMethod::Custom(vec![1, 1, 6, 7, 12])).is_ok());
    assert!(game.start().is_ok());
    let mut total = Duration::ZERO;
    for answer in ["((1+12)-(1+6))*7", "6*(((12-7)+1)+1)", "((12*(1-1))+6)*7"] {
        std::thread::sleep(Duration::from_millis(50));
        match game.solve(answer, DEFAULT_PLAYER) {
            Ok(interval) => {
                assert!(interval >= Duration::from_millis(50));
                assert!(interval < Duration::from_secs(2));
                total += interval;
            }
            Err(e) => panic!("{} rejected: {}", answer, e),
        }
    }
    match game.stop() {
        Ok(elapsed) => {
            assert!(elapsed >= total);
            assert!(elapsed - total < Duration::from_secs(1));
        }
        Err(e) => panic!("stop failed: {}", e),
    }
}

#[test]
fn test_custom_and_probability_generation() {
    let (mut game, _) = new_game();

    let no_problem = GenerateOptions::default();
    assert!(matches!(
        game.generate_problem("custom", &no_problem),
        Err(GameError::Generate(GenerateError::FailedToParse(_)))
    ));
    let zeros = GenerateOptions {
        problem: Some(vec![0, 0, 0, 0, 0]),
        ..GenerateOptions::default()
    };
    assert_eq!(
        game.generate_problem("custom", &zeros),
        Err(GameError::Generate(GenerateError::NoSolution(
            "(0, 0, 0, 0, 0)".to_string()
        )))
    );
    let unknown = GenerateOptions {
        problem: Some(vec![6, 7, 0, 0, 0]),
        ..GenerateOptions::default()
    };
    assert_eq!(
        game.generate_problem("wrong_method", &unknown),
        Err(GameError::Generate(GenerateError::MethodNotFound(
            "wrong_method".to_string()
        )))
    );
    assert!(game.generate_problem("custom", &unknown).is_ok());
    assert!(game.start().is_ok());
    assert_eq!(game.current_problem(), Ok(problem(&[0, 0, 0, 6, 7])));
    assert!(game.stop().is_ok());

    let short = GenerateOptions {
        prob: Some(vec![1.0, 2.0]),
        ..GenerateOptions::default()
    };
    assert_eq!(
        game.generate_problem("probability", &short),
        Err(GameError::Generate(GenerateError::UnmatchedProbLength(2)))
    );
    let weighted = GenerateOptions {
        prob: Some(vec![0.0, 100.0, 0.0]),
        ..GenerateOptions::default()
    };
    assert!(game.generate_problem("probability", &weighted).is_ok());
    assert!(game.start().is_ok());
    assert_eq!(game.current_problem(), Ok(problem(&[1, 1, 6, 7, 12])));
}

#[test]
fn test_stop_discards_pending_problem() {
    let (mut game, _) = playing(vec![3, 4, 6, 7, 12]);
    assert!(game.stop().is_ok());
    assert_eq!(
        game.start(),
        Err(GameError::Status(StatusError::NoPendingProblem))
    );
}

#[test]
fn test_validate_submission_without_session() {
    let problem = problem(&[3, 4, 6, 7, 12]);
    let submission = validate_submission(" 6 × 7 + (12 - 3 × 4) ", &problem);
    assert_eq!(
        submission.map(|s| s.text),
        Ok("6*7+(12-3*4)".to_string())
    );
}

#[test]
fn test_error_display_and_codes() {
    let cases: Vec<(GameError, &str, u8)> = vec![
        (
            StatusError::RequireCertainStatus(Status::Playing).into(),
            "StatusError:RequireCertainStatus[Playing]",
            0x00,
        ),
        (
            GenerateError::FailedToParse("Unable to parse".to_string()).into(),
            "ProblemGenerateError:FailedToParse[Unable to parse]",
            0x01,
        ),
        (
            GenerateError::NoSolution("(0, 1, 2, 3, 4)".to_string()).into(),
            "ProblemGenerateError:NoSolution[(0, 1, 2, 3, 4)]",
            0x02,
        ),
        (
            GenerateError::UnmatchedProbLength(10).into(),
            "ProblemGenerateError:UnmatchedProbLength[10]",
            0x03,
        ),
        (
            GenerateError::MethodNotFound("wpalpek".to_string()).into(),
            "ProblemGenerateError:MethodNotFound[wpalpek]",
            0x04,
        ),
        (
            FormatError::ExpressionTooLong(40).into(),
            "FormatError:ExpressionTooLong[40]",
            0x10,
        ),
        (
            FormatError::DivisionByZero.into(),
            "FormatError:DivisionByZero[-]",
            0x13,
        ),
        (
            FormatError::NotAnInteger("1.0".to_string()).into(),
            "FormatError:NotAnInteger[1.0]",
            0x14,
        ),
        (
            AnswerError::RepeatedAnswer("6*7+0+0+0".to_string()).into(),
            "AnswerError:RepeatedAnswer[6*7+0+0+0]",
            0x21,
        ),
    ];
    for (error, display, code) in cases {
        assert_eq!(error.to_string(), display);
        assert_eq!(error.code(), code);
    }
}
