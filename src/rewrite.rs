//! URL rewriting for vendor style documents and asset requests.
//!
//! Styles handed out by the vendor embed its asset host and the account key
//! in every sprite, glyph and tile reference. The relay swaps the host for
//! its own asset route and drops the key, then adds the key back on the way
//! out in [`upstream_asset_url`].

use serde_json::Value;

/// Point `url` at the relay instead of the vendor and strip any `key=`
/// query parameter. URL templates such as `{z}/{x}/{y}` or `{fontstack}`
/// pass through untouched.
pub fn rewrite_asset_url(url: &str, vendor_host_prefix: &str, relay_asset_prefix: &str) -> String {
    let rehosted = match url.strip_prefix(vendor_host_prefix) {
        Some(rest) => format!("{}{}", relay_asset_prefix, rest),
        None => url.to_string(),
    };
    strip_key_param(&rehosted)
}

fn strip_key_param(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };
    let kept = query
        .split('&')
        .filter(|param| !param.is_empty() && !is_key_param(param))
        .collect::<Vec<_>>()
        .join("&");
    if kept.is_empty() {
        base.to_string()
    } else {
        format!("{}?{}", base, kept)
    }
}

fn is_key_param(param: &str) -> bool {
    param == "key" || param.starts_with("key=")
}

/// Rewrite every key-bearing reference of a style document in place:
/// `sprite`, `glyphs`, `sources[*].url` and `sources[*].tiles[*]`.
/// Everything else in the document is left as it is.
pub fn rewrite_style(style: &mut Value, vendor_host_prefix: &str, relay_asset_prefix: &str) {
    let rewrite = |s: &mut String| {
        *s = rewrite_asset_url(s, vendor_host_prefix, relay_asset_prefix);
    };

    match style.get_mut("sprite") {
        Some(Value::String(sprite)) => rewrite(sprite),
        // multi-sprite form: [{ "id": "...", "url": "..." }]
        Some(Value::Array(sprites)) => {
            for entry in sprites {
                if let Some(Value::String(url)) = entry.get_mut("url") {
                    rewrite(url);
                }
            }
        }
        _ => {}
    }

    if let Some(Value::String(glyphs)) = style.get_mut("glyphs") {
        rewrite(glyphs);
    }

    if let Some(Value::Object(sources)) = style.get_mut("sources") {
        for source in sources.values_mut() {
            if let Some(Value::String(url)) = source.get_mut("url") {
                rewrite(url);
            }
            if let Some(Value::Array(tiles)) = source.get_mut("tiles") {
                for tile in tiles {
                    if let Value::String(template) = tile {
                        rewrite(template);
                    }
                }
            }
        }
    }
}

/// Rebuild the vendor URL for an asset path received by the relay, adding
/// the key with `&` if the request already carried a query string.
pub fn upstream_asset_url(vendor_base: &str, path: &str, query: Option<&str>, key: &str) -> String {
    let base = vendor_base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    match query.filter(|q| !q.is_empty()) {
        Some(query) => format!("{}/{}?{}&key={}", base, path, query, key),
        None => format!("{}/{}?key={}", base, path, key),
    }
}
