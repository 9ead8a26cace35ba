//! 邀请码生成模块

use rand::Rng;

/// 邀请码字符集（小写字母+数字）
const BASE36: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
/// 邀请码长度下限
pub const CODE_MIN_LEN: usize = 4;
/// 邀请码长度上限
pub const CODE_MAX_LEN: usize = 8;

/// 从Twitter用户名派生邀请码
///
/// 仅保留ASCII字母数字并转小写，截断到8位；
/// 剩余不足4位时追加4位随机base36字符，再截断到8位。
pub fn derive_referral_code(handle: &str) -> String {
    let mut code = sanitize_handle(handle, CODE_MAX_LEN);

    if code.len() < CODE_MIN_LEN {
        code.push_str(&random_base36(4));
        code.truncate(CODE_MAX_LEN);
    }

    code
}

/// 唯一性冲突后的再生成：取派生码前4位，追加4位新的随机后缀
pub fn regenerate_referral_code(handle: &str) -> String {
    let mut code = sanitize_handle(handle, CODE_MIN_LEN);

    code.push_str(&random_base36(4));
    code.truncate(CODE_MAX_LEN);

    code
}

/// 生成n位随机base36字符串
pub fn random_base36(n: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..n).map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char).collect()
}

fn sanitize_handle(handle: &str, max_len: usize) -> String {
    handle
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .take(max_len)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_valid_code(code: &str) -> bool {
        (CODE_MIN_LEN..=CODE_MAX_LEN).contains(&code.len())
            && code.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    }

    #[test]
    fn test_derive_from_long_handle_is_deterministic() {
        assert_eq!(derive_referral_code("AliceWonderland"), "alicewon");
        assert_eq!(derive_referral_code("AliceWonderland"), "alicewon");
    }

    #[test]
    fn test_derive_strips_non_alphanumerics() {
        assert_eq!(derive_referral_code("al_ice.99!"), "alice99");
    }

    #[test]
    fn test_derive_pads_short_handles() {
        let code = derive_referral_code("ab");
        assert_eq!(code.len(), 6);
        assert!(code.starts_with("ab"));
        assert!(is_valid_code(&code));
    }

    #[test]
    fn test_derive_from_symbols_only_handle() {
        let code = derive_referral_code("___");
        assert_eq!(code.len(), 4);
        assert!(is_valid_code(&code));
    }

    #[test]
    fn test_exactly_four_chars_not_padded() {
        assert_eq!(derive_referral_code("a1b2"), "a1b2");
    }

    #[test]
    fn test_regenerate_keeps_prefix_and_varies_suffix() {
        let first = regenerate_referral_code("alicewonder");
        let second = regenerate_referral_code("alicewonder");

        assert!(first.starts_with("alic"));
        assert!(second.starts_with("alic"));
        assert_eq!(first.len(), 8);
        assert!(is_valid_code(&first));
        // 4位base36后缀共1679616种取值，两次相同的概率可忽略
        assert_ne!(first, second);
    }

    #[test]
    fn test_regenerate_with_empty_handle() {
        let code = regenerate_referral_code("");
        assert_eq!(code.len(), 4);
        assert!(is_valid_code(&code));
    }

    #[test]
    fn test_random_base36_charset() {
        let sample = random_base36(64);
        assert_eq!(sample.len(), 64);
        assert!(sample.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }
}
