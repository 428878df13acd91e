//! Performance benchmarks for the Thillai Cable backend
//!
//! Covers the hot paths of a request: submission validation and template
//! rendering on the relay side, rate arithmetic and report formatting on
//! the speed test side.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use std::time::Duration;
use thillai_cable::{
    models::{ContactForm, QuoteForm, RateSample, SpeedTestReport},
    output::OutputFormatterFactory,
    relay::{templates, validate_contact, validate_quote, BusinessProfile, Envelope},
    speedtest::{megabits_per_second, RateMeter},
    types::{PhaseOutcome, TestPhase},
};

fn contact_form() -> ContactForm {
    ContactForm {
        name: Some("Priya Raman".to_string()),
        email: Some("priya@example.com".to_string()),
        message: Some("Please call me about a fiber connection. <b>Evenings</b> work best.".to_string()),
    }
}

fn quote_form() -> QuoteForm {
    QuoteForm {
        name: Some("Karthik".to_string()),
        email: Some("karthik@example.com".to_string()),
        phone: Some("+91 9000000000".to_string()),
        address: Some("12 Main Road, Karungallur".to_string()),
        plan: Some("Fiber 100".to_string()),
        message: None,
    }
}

fn sample_report() -> SpeedTestReport {
    let mut report = SpeedTestReport::new("http://127.0.0.1:3000".to_string());
    report.latency = PhaseOutcome::measured(14.0);
    report.download.outcome = PhaseOutcome::measured(94.37);
    report.download.total_bytes = 58_982_400;
    report.upload.outcome = PhaseOutcome::unavailable("connection reset");
    report.finish();
    report
}

/// Benchmark submission validation
fn benchmark_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");

    group.bench_function("validate_contact", |b| {
        let form = contact_form();
        b.iter(|| black_box(validate_contact(black_box(form.clone())).is_ok()));
    });

    group.bench_function("validate_quote", |b| {
        let form = quote_form();
        b.iter(|| black_box(validate_quote(black_box(form.clone())).is_ok()));
    });

    group.bench_function("reject_invalid_contact", |b| {
        let form = ContactForm {
            email: Some("not-an-email".to_string()),
            ..ContactForm::default()
        };
        b.iter(|| black_box(validate_contact(black_box(form.clone())).is_err()));
    });

    group.finish();
}

/// Benchmark message rendering
fn benchmark_templates(c: &mut Criterion) {
    let mut group = c.benchmark_group("templates");
    let business = BusinessProfile::default();
    let envelope = Envelope {
        sender: "relay@thillaicable.com",
        operator: "admin@thillaicable.com",
        business: &business,
    };

    let contact = validate_contact(contact_form()).ok();
    let quote = validate_quote(quote_form()).ok();

    if let Some(contact) = contact {
        group.bench_function("contact_messages", |b| {
            b.iter(|| {
                let notification = templates::contact_notification(black_box(&contact), &envelope);
                let acknowledgment = templates::contact_acknowledgment(black_box(&contact), &envelope);
                black_box((notification, acknowledgment));
            });
        });
    }

    if let Some(quote) = quote {
        group.bench_function("quote_messages", |b| {
            b.iter(|| {
                let notification = templates::quote_notification(black_box(&quote), &envelope);
                let acknowledgment = templates::quote_acknowledgment(black_box(&quote), &envelope);
                black_box((notification, acknowledgment));
            });
        });
    }

    for size in [64usize, 1024, 16 * 1024] {
        let text = "<script>alert('x')</script> & ".repeat(size / 32);
        group.bench_with_input(BenchmarkId::new("escape_html", size), &text, |b, text| {
            b.iter(|| black_box(templates::escape_html(black_box(text))));
        });
    }

    group.finish();
}

/// Benchmark rate arithmetic
fn benchmark_rates(c: &mut Criterion) {
    let mut group = c.benchmark_group("rates");

    group.bench_function("megabits_per_second", |b| {
        b.iter(|| black_box(megabits_per_second(black_box(5_242_880), black_box(Duration::from_secs(2)))));
    });

    for chunks in [16usize, 256, 4096] {
        group.bench_with_input(BenchmarkId::new("meter_record", chunks), &chunks, |b, &chunks| {
            b.iter(|| {
                let mut meter = RateMeter::start(TestPhase::Download);
                for _ in 0..chunks {
                    meter.record(black_box(65_536));
                }
                black_box(meter.final_rate(Duration::from_secs(1)))
            });
        });
    }

    group.finish();
}

/// Benchmark report rendering
fn benchmark_output(c: &mut Criterion) {
    let mut group = c.benchmark_group("output");
    let report = sample_report();
    let sample = RateSample {
        phase: TestPhase::Download,
        elapsed: Duration::from_millis(2500),
        total_bytes: 31_457_280,
        mbps: 96.0,
    };

    for (name, color) in [("plain", false), ("colored", true)] {
        let formatter = OutputFormatterFactory::create_formatter(color, true);
        group.bench_function(BenchmarkId::new("format_report", name), |b| {
            b.iter(|| black_box(formatter.format_report(black_box(&report)).is_ok()));
        });
        group.bench_function(BenchmarkId::new("format_sample", name), |b| {
            b.iter(|| black_box(formatter.format_sample(black_box(&sample))));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_validation,
    benchmark_templates,
    benchmark_rates,
    benchmark_output
);
criterion_main!(benches);
