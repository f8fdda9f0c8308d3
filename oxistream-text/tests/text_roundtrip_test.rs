//! End-to-end tests pushing text out through `TextWriter` and
//! scanning it back with `TextReader`.

use oxistream_core::buffer::Buffer;
use oxistream_text::{TextReader, TextWriter};

#[test]
fn test_config_file_roundtrip() {
    let mut sink = Buffer::new();
    {
        let mut writer = TextWriter::new(&mut sink);
        writer.write_line("# generated").unwrap();
        writer.write_str("width = ").unwrap();
        writer.write_value_line(1920).unwrap();
        writer.write_str("scale = ").unwrap();
        writer.write_value_line(1.5).unwrap();
        writer.write_str("label = ").unwrap();
        writer.write_line("\"hello \\\"world\\\"\"").unwrap();
    }

    let mut reader = TextReader::from_bytes(sink.as_slice());
    assert_eq!(reader.read_line().unwrap().unwrap(), "# generated");

    // Stepping over "width" also steps over the '=' separator.
    assert_eq!(reader.read_token(b"", true).unwrap(), "width");
    assert_eq!(reader.token_as_u32(b"", true).unwrap(), 1920);

    assert!(reader.move_to_line("scale").unwrap());
    assert_eq!(reader.read_to(b'=', true).unwrap().unwrap(), "scale ");
    assert_eq!(reader.token_as_f64(b"", true).unwrap(), 1.5);

    assert!(reader.move_to_line("label").unwrap());
    let quoted = reader.read_quoted("\"", b'\\').unwrap();
    assert_eq!(quoted, "hello \\\"world\\\"");
}

#[test]
fn test_lines_written_match_lines_read() {
    let lines = ["alpha", "", "beta gamma", "  indented"];

    let mut sink = Buffer::new();
    {
        let mut writer = TextWriter::new(&mut sink);
        for line in lines {
            writer.write_line(line).unwrap();
        }
    }

    let mut reader = TextReader::from_bytes(sink.as_slice());
    for expected in lines {
        assert_eq!(reader.read_line().unwrap().unwrap(), expected);
    }
    assert_eq!(reader.read_line().unwrap(), None);
}

#[test]
fn test_scanning_over_a_live_stream() {
    // A small reader buffer forces refills mid-token.
    let mut transport = Buffer::new();
    {
        let mut writer = TextWriter::new(&mut transport);
        for n in 0..500 {
            writer.write_value(n).unwrap();
            writer.write_char(' ').unwrap();
        }
    }
    transport.rewind();

    let mut reader = TextReader::with_capacity(&mut transport, 32);
    for n in 0..500 {
        assert_eq!(reader.token_as_i32(b"", true).unwrap(), n);
    }
    assert!(reader.eof().unwrap());
}
