use super::error::ValidationError;
use crate::hwpx::SENTINEL_PARAGRAPH_ID;

/// 단조 증가 ID 할당기. 현재 값을 돌려주고 1 증가한다.
///
/// `u64::MAX`를 넘어가면 더 이상 증가하지 않고 `overflowed()`가 참이 된다.
/// 이때 나온 ID는 중복이므로 호출자가 결과를 버려야 한다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    base: u64,
    /// `None`이면 `u64::MAX`까지 모두 할당함
    next: Option<u64>,
    overflowed: bool,
}

impl IdAllocator {
    pub fn new(base: u64) -> Self {
        Self {
            base,
            next: Some(base),
            overflowed: false,
        }
    }

    pub fn next_id(&mut self) -> u64 {
        match self.next {
            Some(id) => {
                self.next = id.checked_add(1);
                id
            }
            None => {
                self.overflowed = true;
                u64::MAX
            }
        }
    }

    /// 다음에 할당될 값. 범위를 다 썼으면 `None`.
    pub fn peek(&self) -> Option<u64> {
        self.next
    }

    pub fn base(&self) -> u64 {
        self.base
    }

    /// 지금까지 할당한 개수 (중복 할당 제외)
    pub fn issued(&self) -> u64 {
        match self.next {
            Some(next) => next - self.base,
            None => u64::MAX - self.base + 1,
        }
    }

    /// 할당한 범위에 `id`가 포함되는지
    pub fn has_issued(&self, id: u64) -> bool {
        id >= self.base && self.next.map_or(true, |next| id < next)
    }

    pub fn overflowed(&self) -> bool {
        self.overflowed
    }
}

/// 문단 ID와 표 ID 두 네임스페이스. 생성 호출마다 새로 만든다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSpace {
    pub paragraphs: IdAllocator,
    pub tables: IdAllocator,
}

impl IdSpace {
    pub fn new(base_paragraph_id: u64, base_table_id: u64) -> Self {
        Self {
            paragraphs: IdAllocator::new(base_paragraph_id),
            tables: IdAllocator::new(base_table_id),
        }
    }

    pub fn paragraph(&mut self) -> u64 {
        self.paragraphs.next_id()
    }

    pub fn table(&mut self) -> u64 {
        self.tables.next_id()
    }

    /// 어느 쪽이든 `u64::MAX`를 넘겨 할당했으면 에러
    pub fn ensure_in_range(&self) -> Result<(), ValidationError> {
        for (namespace, allocator) in [("Paragraph", &self.paragraphs), ("Table", &self.tables)] {
            if allocator.overflowed() {
                return Err(ValidationError::IdOverflow {
                    namespace,
                    base: allocator.base(),
                });
            }
        }
        Ok(())
    }

    /// 템플릿 문단의 고정 ID와 겹치게 할당했는지
    pub fn collides_with_sentinel(&self) -> bool {
        self.paragraphs.has_issued(SENTINEL_PARAGRAPH_ID)
    }
}
