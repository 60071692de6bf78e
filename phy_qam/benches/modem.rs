//! Modulation/demodulation benchmarks

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use phy_qam::{Demodulator, Mapper, ModulationOrder, Modulator};

fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 256) as u8).collect()
}

fn benchmark_qpsk_modulate(c: &mut Criterion) {
    let modulator = Modulator::with_mapper(Arc::new(Mapper::new(ModulationOrder::Qpsk)));
    let data = payload(250); // 1000 symbols

    c.bench_function("qpsk_modulate_1000_symbols", |b| {
        b.iter(|| black_box(modulator.modulate(&data).unwrap()))
    });
}

fn benchmark_qam64_modulate(c: &mut Criterion) {
    let modulator = Modulator::with_mapper(Arc::new(Mapper::new(ModulationOrder::Qam64)));
    let data = payload(750); // 1000 symbols

    c.bench_function("qam64_modulate_1000_symbols", |b| {
        b.iter(|| black_box(modulator.modulate(&data).unwrap()))
    });
}

fn benchmark_qam64_demodulate(c: &mut Criterion) {
    let mapper = Arc::new(Mapper::new(ModulationOrder::Qam64));
    let modulator = Modulator::with_mapper(mapper.clone());
    let demodulator = Demodulator::with_mapper(mapper);
    let symbols = modulator.modulate(&payload(750)).unwrap();

    c.bench_function("qam64_demodulate_1000_symbols", |b| {
        b.iter(|| black_box(demodulator.demodulate(&symbols).unwrap()))
    });
}

criterion_group!(
    benches,
    benchmark_qpsk_modulate,
    benchmark_qam64_modulate,
    benchmark_qam64_demodulate
);
criterion_main!(benches);
