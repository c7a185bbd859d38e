use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pick_semver::{php_version_compare, Constraint, ConstraintInterface, ConstraintParser, Operator};

fn bench_php_version_compare(c: &mut Criterion) {
    let cases = [
        ("1.2.3.0", "1.2.4.0", Operator::LessThan),
        ("2.4.0.0-alpha", "2.4.0.0", Operator::LessThan),
        ("2.1.0.0-dev", "2.1.0.0", Operator::LessThan),
        ("1.0.0.0", "1", Operator::GreaterThanOrEqual),
        ("dev-master", "dev-feature", Operator::NotEqual),
        ("1.2.3.0-RC1", "1.2.3.0", Operator::LessThan),
        ("1.2.3.0-pl1", "1.2.3.0", Operator::GreaterThan),
    ];

    c.bench_function("php_version_compare", |b| {
        b.iter(|| {
            for (a, bver, op) in cases {
                black_box(php_version_compare(black_box(a), black_box(bver), op));
            }
        })
    });
}

fn bench_parse_constraints(c: &mut Criterion) {
    let parser = ConstraintParser::new();
    let constraints = [
        "*",
        "== 5.0.0.0",
        ">=1.2.3.0 <2.0.0.0",
        ">=1.0.0.0, <1.1.0.0 || >=2.0.0.0",
        "1.0.0.0 || 2.0.0.0 || 3.0.0.0",
    ];

    c.bench_function("parse_constraints", |b| {
        b.iter(|| {
            for constraint in constraints {
                black_box(parser.parse(black_box(constraint)).ok());
            }
        })
    });
}

fn bench_match_exact_version(c: &mut Criterion) {
    let parser = ConstraintParser::new();
    let Ok(range) = parser.parse(">=1.0.0.0, <1.1.0.0 || >=2.0.0.0") else {
        return;
    };
    let versions = ["0.9.0.0", "1.0.5.0", "1.5.0.0", "2.0.0.0-beta1", "3.0.0.0"];

    c.bench_function("match_exact_version", |b| {
        b.iter(|| {
            for version in versions {
                let exact = Constraint::new(Operator::Equal, version);
                black_box(range.matches(black_box(&exact)));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_php_version_compare,
    bench_parse_constraints,
    bench_match_exact_version
);
criterion_main!(benches);
