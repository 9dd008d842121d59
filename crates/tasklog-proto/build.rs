//! Generates the tonic client and server for the `Monitor` service.
//!
//! The messages are declared with prost derives in `src/lib.rs`, so only the
//! service stubs are generated here and no `protoc` is needed. The wire
//! contract lives in `proto/monitor.proto` at the workspace root; the tests
//! in `src/lib.rs` check the names and field tags against it.

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=../../proto/monitor.proto");

    let read_output = tonic_build::manual::Method::builder()
        .name("read_output")
        .route_name("ReadOutput")
        .input_type("crate::pb::ReadOutputRequest")
        .output_type("crate::pb::ReadOutputReply")
        .codec_path("tonic::codec::ProstCodec")
        .build();

    // No package: the wire path is "/Monitor/ReadOutput".
    let monitor = tonic_build::manual::Service::builder()
        .name("Monitor")
        .package("")
        .method(read_output)
        .build();

    tonic_build::manual::Builder::new()
        .build_server(true)
        .build_client(true)
        .compile(&[monitor]);
}
