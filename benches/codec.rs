use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use dynmsg::{decode, encode, DynMessage};

/// Build a message with `fields` mixed-type fields
fn message_with(fields: usize) -> DynMessage {
    let mut msg = DynMessage::new("bench");
    for i in 0..fields {
        match i % 4 {
            0 => msg.put_i32(format!("int_{i}"), i as i32),
            1 => msg.put_u64(format!("long_{i}"), i as u64),
            2 => msg.put_f64(format!("float_{i}"), i as f64 * 0.5),
            _ => msg.put_str(format!("str_{i}"), "payload payload payload"),
        }
    }
    msg
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    for fields in [4, 16, 64] {
        let msg = message_with(fields);
        let frame_len = encode(&msg).unwrap().len();
        group.throughput(Throughput::Bytes(frame_len as u64));
        group.bench_function(format!("encode_{fields}_fields"), |b| {
            b.iter(|| {
                black_box(encode(&msg).unwrap());
            });
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    for fields in [4, 16, 64] {
        let msg = message_with(fields);
        let frame = encode(&msg).unwrap();
        group.throughput(Throughput::Bytes(frame.len() as u64));
        group.bench_function(format!("decode_{fields}_fields"), |b| {
            b.iter(|| {
                black_box(decode(frame.as_bytes()).unwrap());
            });
        });
    }

    group.finish();
}

fn bench_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    let msg = message_with(16);
    let frame_len = encode(&msg).unwrap().len();
    group.throughput(Throughput::Bytes(frame_len as u64));
    group.bench_function("roundtrip_16_fields", |b| {
        b.iter(|| {
            let frame = encode(&msg).unwrap();
            black_box(decode(frame.as_bytes()).unwrap());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_roundtrip);
criterion_main!(benches);
