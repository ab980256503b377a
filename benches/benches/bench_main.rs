
use criterion::criterion_main;

criterion_main!(benchmarks::validate::validate);
