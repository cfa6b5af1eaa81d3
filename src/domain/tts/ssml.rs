use super::dto::SynthesisRequest;

/// Render the SSML document sent to the provider.
///
/// The output is hashed into the cache key, so any formatting change here
/// invalidates every cached artifact. Requests without lexicon or prosody
/// render exactly as the plain voice template. Text is embedded verbatim so
/// callers may pass inline markup.
pub fn render_ssml(request: &SynthesisRequest) -> String {
    let mut body = String::new();

    if let Some(lexicon) = &request.lexicon {
        body.push_str(&format!("<lexicon uri=\"{}\"/>", escape_attribute(lexicon)));
    }

    if request.prosody.is_empty() {
        body.push_str(&request.text);
    } else {
        body.push_str("<prosody");
        if let Some(rate) = &request.prosody.rate {
            body.push_str(&format!(" rate=\"{}\"", escape_attribute(rate)));
        }
        if let Some(pitch) = &request.prosody.pitch {
            body.push_str(&format!(" pitch=\"{}\"", escape_attribute(pitch)));
        }
        body.push('>');
        body.push_str(&request.text);
        body.push_str("</prosody>");
    }

    format!(
        r#"
<speak version="1.0"
       xmlns="https://www.w3.org/2001/10/synthesis"
       xmlns:mstts="http://www.w3.org/2001/mstts"
       xml:lang="{language}">
  <voice name="{voice}">
      {body}
  </voice>
</speak>
"#,
        language = request.language(),
        voice = request.voice,
        body = body,
    )
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
