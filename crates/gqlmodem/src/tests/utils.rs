use crate::{scan, Error, Token};

/// One observed callback invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Emitted {
    pub token: Token,
    pub value: Option<Vec<u8>>,
    pub level: usize,
}

/// Scans `input`, copying out every emission.
pub(crate) fn collect(input: &[u8]) -> Result<Vec<Emitted>, Error> {
    let mut out = Vec::new();
    scan(input, |sc| {
        out.push(Emitted {
            token: sc.token(),
            value: sc.value().map(<[u8]>::to_vec),
            level: sc.selection_level(),
        });
        false
    })?;
    Ok(out)
}

/// Scans `input` into compact `Kind` / `Kind(payload)` strings for
/// stream-shape assertions.
pub(crate) fn render(input: &[u8]) -> Result<Vec<String>, Error> {
    Ok(collect(input)?
        .into_iter()
        .map(|e| match e.value {
            Some(v) => format!("{:?}({})", e.token, String::from_utf8_lossy(&v)),
            None => format!("{:?}", e.token),
        })
        .collect())
}

/// Asserts that `input` scans into exactly `expected`.
pub(crate) fn assert_stream(input: &[u8], expected: &[&str]) {
    let got = render(input).unwrap_or_else(|err| {
        panic!(
            "scan of {:?} failed: {err}",
            String::from_utf8_lossy(input)
        )
    });
    assert_eq!(got, expected, "input: {:?}", String::from_utf8_lossy(input));
}
