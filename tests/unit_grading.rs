use schoolbook::schoolbook_core::grading::{
    Component, GradeBreakdown, GradingError, LetterGrade, check_weight_capacity,
    competition_rank, compute_final_grade, mean, remark_for, validate_score,
    validate_weight_scheme,
};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_ca_and_exam_give_82_a() {
    let results = [Component::new(32.0, 40.0, 40.0), Component::new(50.0, 60.0, 60.0)];

    let (score, grade) = compute_final_grade(&results);

    assert!(approx(score, 82.0));
    assert_eq!(grade, LetterGrade::A);
    assert_eq!(grade.remark(), "Very Good");
}

#[test]
fn test_ninety_is_a_plus() {
    let results = [Component::new(36.0, 40.0, 40.0), Component::new(54.0, 60.0, 60.0)];

    let (score, grade) = compute_final_grade(&results);

    assert!(approx(score, 90.0));
    assert_eq!(grade, LetterGrade::APlus);
    assert_eq!(grade.to_string(), "A+");
}

#[test]
fn test_perfect_and_zero_scores() {
    let perfect = [Component::new(40.0, 40.0, 40.0), Component::new(60.0, 60.0, 60.0)];
    assert_eq!(compute_final_grade(&perfect), (100.0, LetterGrade::APlus));

    let zero = [Component::new(0.0, 40.0, 40.0), Component::new(0.0, 60.0, 60.0)];
    assert_eq!(compute_final_grade(&zero), (0.0, LetterGrade::F));
}

#[test]
fn test_incomplete_subject_is_flagged() {
    let ca_only = [Component::new(20.0, 40.0, 40.0)];

    let breakdown = GradeBreakdown::from_components(&ca_only);

    assert!(approx(breakdown.final_score, 20.0));
    assert_eq!(breakdown.grade, LetterGrade::F);
    assert!(!breakdown.is_complete());
    assert_eq!(breakdown.contributions.len(), 1);
}

#[test]
fn test_remarks_for_each_band() {
    let cases = [
        (95.0, "Excellent"),
        (85.0, "Very Good"),
        (75.0, "Good"),
        (65.0, "Satisfactory"),
        (55.0, "Needs Improvement"),
        (10.0, "Poor"),
    ];
    for (score, remark) in cases {
        assert_eq!(remark_for(score), remark, "score {score}");
    }
}

#[test]
fn test_score_bounds() {
    assert!(validate_score(0.0, 40.0).is_ok());
    assert!(validate_score(40.0, 40.0).is_ok());
    assert_eq!(validate_score(-1.0, 40.0), Err(GradingError::NegativeScore));
    assert_eq!(
        validate_score(41.0, 40.0),
        Err(GradingError::ScoreExceedsMax {
            score: 41.0,
            max_score: 40.0
        })
    );
    assert_eq!(validate_score(f64::NAN, 40.0), Err(GradingError::NonFiniteScore));
    assert_eq!(validate_score(1.0, 0.0), Err(GradingError::InvalidMaxScore));
}

#[test]
fn test_weight_scheme_must_total_100() {
    assert_eq!(validate_weight_scheme([40, 60]), Ok(100));
    assert_eq!(
        validate_weight_scheme([40, 50]),
        Err(GradingError::WeightTotalMismatch { total: 90 })
    );
    assert_eq!(check_weight_capacity([40]), Ok(40));
    assert_eq!(
        check_weight_capacity([40, 70]),
        Err(GradingError::WeightTotalExceeded { total: 110 })
    );
}

#[test]
fn test_class_statistics() {
    let finals = [82.0, 60.0, 82.0];

    assert!(approx(mean(finals).unwrap(), 224.0 / 3.0));
    assert_eq!(mean(std::iter::empty()), None);

    assert_eq!(competition_rank(82.0, &finals), 1);
    assert_eq!(competition_rank(60.0, &finals), 3);
}

#[test]
fn test_final_grade_is_deterministic() {
    let results = [
        Component::new(27.5, 40.0, 40.0),
        Component::new(41.25, 60.0, 60.0),
    ];

    let first = compute_final_grade(&results);
    for _ in 0..100 {
        assert_eq!(compute_final_grade(&results), first);
    }

    let reversed = [results[1], results[0]];
    let (score, grade) = compute_final_grade(&reversed);
    assert!(approx(score, first.0));
    assert_eq!(grade, first.1);
}

#[test]
fn test_final_score_stays_within_percentage_range() {
    let schemes: [&[(f64, f64)]; 4] = [
        &[(40.0, 40.0), (60.0, 60.0)],
        &[(20.0, 10.0), (20.0, 10.0), (100.0, 80.0)],
        &[(100.0, 100.0)],
        &[(15.0, 30.0), (15.0, 30.0), (70.0, 40.0)],
    ];

    for scheme in schemes {
        for step in 0..=10 {
            let fraction = f64::from(step) / 10.0;
            let results: Vec<Component> = scheme
                .iter()
                .map(|&(max, weight)| Component::new(max * fraction, max, weight))
                .collect();

            let (score, grade) = compute_final_grade(&results);

            assert!(
                (0.0..=100.0 + 1e-9).contains(&score),
                "score {score} out of range for fraction {fraction}"
            );
            assert!(approx(score, fraction * 100.0));
            assert_eq!(grade, LetterGrade::from_score(score));
        }
    }
}
