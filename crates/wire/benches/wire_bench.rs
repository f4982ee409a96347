use std::hint::black_box;

use bytes::BytesMut;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use stream_wire::codec::body::decode_next_chunk_size;
use stream_wire::codec::header::{find_line, parse_header_block};
use stream_wire::connection::find_header_boundary;
use stream_wire::protocol::{Request, Response};

const HEADER_BLOCK: &[u8] = b"Host: media.example.com\r\n\
User-Agent: player/2.1 (Linux; x86_64)\r\n\
Accept: */*\r\n\
Accept-Encoding: identity\r\n\
Range: bytes=0-\r\n\
Connection: close\r\n\r\n";

const RESPONSE_HEAD: &[u8] = b"HTTP/1.1 206 Partial Content\r\n\
Content-Type: video/MP2T\r\n\
Content-Length: 188000\r\n\
Content-Range: bytes 0-187999/940000\r\n\
Server: nginx/1.24.0\r\n\r\n";

fn framer(c: &mut Criterion) {
    let mut group = c.benchmark_group("framer");
    group.throughput(Throughput::Bytes(HEADER_BLOCK.len() as u64));

    group.bench_function("find_line", |b| b.iter(|| find_line(black_box(HEADER_BLOCK))));
    group.bench_function("parse_header_block", |b| b.iter(|| parse_header_block(black_box(HEADER_BLOCK))));
    group.bench_function("find_header_boundary", |b| b.iter(|| find_header_boundary(black_box(RESPONSE_HEAD))));

    group.finish();
}

fn messages(c: &mut Criterion) {
    let mut group = c.benchmark_group("messages");

    group.bench_function("parse_response_head", |b| b.iter(|| Response::parse(black_box(RESPONSE_HEAD))));

    let mut request = Request::create_default_get_request("/live/1080p/segment-000042.ts");
    request.set_host("media.example.com");
    request.set_header("Accept", "*/*");
    request.set_header("Range", "bytes=0-");
    group.bench_function("serialize_request", |b| b.iter(|| black_box(&request).serialize()));

    group.finish();
}

fn chunk_size(c: &mut Criterion) {
    c.bench_function("decode_next_chunk_size", |b| {
        b.iter_batched_ref(
            || BytesMut::from(&b"2dc6c;name=value\r\n"[..]),
            |buf| decode_next_chunk_size(black_box(buf)),
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, framer, messages, chunk_size);
criterion_main!(benches);
