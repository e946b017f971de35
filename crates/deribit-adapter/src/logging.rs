/*
[INPUT]:  Raw payload text destined for tracing fields
[OUTPUT]: Bounded previews safe to attach to log records
[POS]:    Shared helpers - log formatting
[UPDATE]: When changing preview limits
*/

pub(crate) const RAW_LOG_MAX_BYTES: usize = 1024;

pub(crate) fn truncate_for_log(value: &str, max_len: usize) -> String {
    if value.len() <= max_len {
        return value.to_string();
    }
    let mut end = max_len;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = String::with_capacity(end + 3);
    out.push_str(&value[..end]);
    out.push_str("...");
    out
}
