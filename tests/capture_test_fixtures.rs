//! 采集文件测试固件生成器
//!
//! 为采集加载、批量扫描和CLI集成测试生成各种CSV采集文件

use fs2::FileExt;
use std::fs::{File, OpenOptions, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

fn log(msg_zh: impl AsRef<str>, msg_en: impl AsRef<str>) {
    println!("{} / {}", msg_zh.as_ref(), msg_en.as_ref());
}

fn fixtures_base_dir() -> &'static PathBuf {
    static ROOT: OnceLock<PathBuf> = OnceLock::new();
    ROOT.get_or_init(|| {
        let path = match std::env::var("PULSE_METER_FIXTURES_DIR") {
            Ok(custom) => PathBuf::from(custom),
            Err(_) => PathBuf::from("tests/fixtures/captures"),
        };
        create_dir_all(&path).expect("无法创建测试固件目录");
        path
    })
}

/// 公开获取固件根目录
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    fixtures_base_dir().clone()
}

/// 获取特定固件文件路径
#[allow(dead_code)]
pub fn fixture_path(name: &str) -> PathBuf {
    fixtures_base_dir().join(name)
}

/// 确保所有固件生成完毕（幂等）
#[allow(dead_code)]
pub fn ensure_fixtures_generated() {
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        CaptureTestFixtures::new().generate_all();
    });
}

/// 为测试输出创建独立的临时目录（不落在固件目录内）
#[allow(dead_code)]
pub fn scratch_dir(test_name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join("digital-pulse-meter-tests")
        .join(format!("{test_name}-{}", std::process::id()));
    create_dir_all(&dir).expect("无法创建临时输出目录");
    dir
}

/// 跨进程文件锁 + 进程内互斥，避免并发写入导致的截断文件
struct FixtureLock {
    _mutex_guard: std::sync::MutexGuard<'static, ()>,
    lock_file: File,
}

impl FixtureLock {
    fn acquire() -> Self {
        static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
        let mutex = MUTEX.get_or_init(|| Mutex::new(()));
        let guard = mutex.lock().expect("Fixture mutex poisoned");

        // 锁文件放在固件目录之外，避免被批量扫描计入
        let lock_path = fixtures_base_dir().with_extension("lock");
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .expect("无法创建固件锁文件");
        file.lock_exclusive()
            .expect("无法获取固件文件锁，可能被其他进程占用");

        Self {
            _mutex_guard: guard,
            lock_file: file,
        }
    }
}

impl Drop for FixtureLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.lock_file);
    }
}

/// 测试固件生成器
pub struct CaptureTestFixtures {
    fixtures_dir: PathBuf,
}

impl CaptureTestFixtures {
    pub fn new() -> Self {
        Self {
            fixtures_dir: fixtures_dir(),
        }
    }

    /// 生成所有测试固件
    pub fn generate_all(&self) {
        let _guard = FixtureLock::acquire();

        log("开始生成采集测试固件...", "Generating capture fixtures...");

        self.create_square_wave();
        self.create_high_start();
        self.create_asymmetric_pwm();
        self.create_never_high();
        self.create_header_only();
        self.create_bad_level();
        self.create_non_monotonic();
        self.create_nested();
        self.create_unsupported_extension();

        log(
            format!("所有测试固件已生成到: {:?}", self.fixtures_dir),
            format!("All fixtures generated at: {:?}", self.fixtures_dir),
        );
    }

    /// 先写临时文件再重命名，读取方不会看到写了一半的文件
    fn write_atomic(&self, relative: &str, content: &str) {
        let target = self.fixtures_dir.join(relative);
        if let Some(parent) = target.parent() {
            create_dir_all(parent).expect("无法创建固件子目录");
        }
        let tmp = target.with_extension("partial");
        {
            let mut file = File::create(&tmp).expect("无法创建固件文件");
            file.write_all(content.as_bytes()).expect("写入固件失败");
        }
        std::fs::rename(&tmp, &target).expect("重命名固件失败");
    }

    /// 两通道：CLK为周期10、占空比50%的方波，DATA为低速翻转
    fn create_square_wave(&self) {
        let mut csv = String::from("Time [s],CLK,DATA\n");
        let mut data = 0;
        for k in 0..5 {
            let base = 10 * k;
            if k == 2 {
                data = 1;
            }
            csv.push_str(&format!("{base},1,{data}\n"));
            csv.push_str(&format!("{},0,{data}\n", base + 5));
            if k == 3 {
                data = 0;
                csv.push_str(&format!("{},0,{data}\n", base + 7));
            }
        }
        csv.push_str("50,1,0\n");
        self.write_atomic("square_wave.csv", &csv);
    }

    /// 高电平起步：初始时刻作为正脉冲与首周期起点
    fn create_high_start(&self) {
        self.write_atomic(
            "high_start.csv",
            "Time [s],SIG\n2,1\n5,0\n12,1\n14,0\n",
        );
    }

    /// 周期20、高电平5的PWM（占空比25%），时间单位为微秒级小数
    fn create_asymmetric_pwm(&self) {
        let mut csv = String::from("Time [s],PWM\n");
        csv.push_str("0.000000,0\n");
        for k in 0..4 {
            let rise = 10e-6 + 20e-6 * k as f64;
            csv.push_str(&format!("{rise:.6},1\n"));
            csv.push_str(&format!("{:.6},0\n", rise + 5e-6));
        }
        self.write_atomic("pwm_quarter.csv", &csv);
    }

    /// 始终为低电平
    fn create_never_high(&self) {
        self.write_atomic("never_high.csv", "Time [s],IDLE\n0,0\n1,0\n2,0\n");
    }

    /// 只有表头没有数据行
    fn create_header_only(&self) {
        self.write_atomic("header_only.csv", "Time [s],EMPTY\n");
    }

    /// 非法电平值
    fn create_bad_level(&self) {
        self.write_atomic("bad_level.csv", "Time [s],X\n0,0\n1,2\n");
    }

    /// 时间戳非递增
    fn create_non_monotonic(&self) {
        self.write_atomic("non_monotonic.csv", "Time [s],X\n0,0\n2,1\n1,0\n");
    }

    /// 子目录中的采集文件（仅递归扫描可见）
    fn create_nested(&self) {
        self.write_atomic("nested/inner.csv", "Time [s],N\n0,0\n1,1\n3,0\n");
    }

    /// 不受支持的扩展名（扫描时应忽略）
    fn create_unsupported_extension(&self) {
        self.write_atomic("readme.md", "not a capture\n");
    }
}

impl Default for CaptureTestFixtures {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
pub fn fixture_exists(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_all_fixtures() {
        ensure_fixtures_generated();
        for name in [
            "square_wave.csv",
            "high_start.csv",
            "pwm_quarter.csv",
            "never_high.csv",
            "header_only.csv",
            "bad_level.csv",
            "non_monotonic.csv",
            "nested/inner.csv",
        ] {
            assert!(fixture_exists(&fixture_path(name)), "缺少固件: {name}");
        }
    }
}
